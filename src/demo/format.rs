//! Compact text format for recordings
//!
//! Format: `CODE|data...`, one record per line
//! - CODE = 2-char record type code
//! - data = pipe-separated values specific to the record type
//!
//! Examples:
//! ```text
//! HD|64.0|de_dust2
//! FR|{"tick":1024,"participants":[...],"bomb":{...},"ct":{...},"t":{...}}
//! RS
//! SK|-512.0,1248.5,32.0|s1mple
//! FX|100.0,-200.0,0.0|_
//! WP
//! ```
//!
//! Frame records carry their state as JSON; everything else stays compact.

use super::error::FormatError;
use super::events::{EventKind, GrenadeDetonation};
use super::types::{RawFrame, SessionHeader};

/// One decoded line of a recording
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Header(SessionHeader),
    Frame(RawFrame),
    Event(EventKind),
}

/// Format a position triple
fn fmt_pos(pos: (f32, f32, f32)) -> String {
    format!("{:.1},{:.1},{:.1}", pos.0, pos.1, pos.2)
}

fn fmt_detonation(d: &GrenadeDetonation) -> String {
    let thrower = d.thrower.as_deref().unwrap_or("_");
    format!("{}|{}", fmt_pos(d.position), thrower)
}

/// Serialize a record to compact text format
pub fn serialize_record(record: &Record) -> String {
    match record {
        Record::Header(header) => format!("HD|{:.3}|{}", header.frame_rate, header.map_name),
        Record::Frame(frame) => {
            // RawFrame holds only plain data, so JSON encoding cannot fail
            let json = serde_json::to_string(frame).unwrap_or_else(|_| "{}".to_string());
            format!("FR|{}", json)
        }
        Record::Event(event) => {
            let code = event.type_code();
            match event {
                EventKind::FlashExplode(d) | EventKind::HeExplode(d) | EventKind::SmokeStart(d) => {
                    format!("{}|{}", code, fmt_detonation(d))
                }
                _ => code.to_string(),
            }
        }
    }
}

/// Parse one non-empty, non-comment line into a record
pub fn parse_record(line: &str) -> Result<Record, FormatError> {
    let (code, rest) = match line.split_once('|') {
        Some((code, rest)) => (code, rest),
        None => (line, ""),
    };

    let record = match code {
        "HD" => {
            let mut parts = rest.splitn(2, '|');
            let rate = parts.next().filter(|s| !s.is_empty()).ok_or(FormatError::MissingField {
                code: "HD",
                field: "frame_rate",
            })?;
            let map_name = parts.next().filter(|s| !s.is_empty()).ok_or(FormatError::MissingField {
                code: "HD",
                field: "map_name",
            })?;
            Record::Header(SessionHeader {
                frame_rate: parse_number(rate)?,
                map_name: map_name.to_string(),
            })
        }
        // The JSON body is everything after the first pipe
        "FR" => Record::Frame(serde_json::from_str(rest)?),
        "RS" => Record::Event(EventKind::RoundStart),
        "MS" => Record::Event(EventKind::MatchStart),
        "GH" => Record::Event(EventKind::HalfEnded),
        "SW" => Record::Event(EventKind::SideSwitch),
        "WP" => Record::Event(EventKind::MatchEnd),
        "FX" => Record::Event(EventKind::FlashExplode(parse_detonation("FX", rest)?)),
        "HX" => Record::Event(EventKind::HeExplode(parse_detonation("HX", rest)?)),
        "SK" => Record::Event(EventKind::SmokeStart(parse_detonation("SK", rest)?)),
        other => return Err(FormatError::UnknownCode(other.to_string())),
    };

    Ok(record)
}

fn parse_detonation(code: &'static str, data: &str) -> Result<GrenadeDetonation, FormatError> {
    let mut parts = data.split('|');
    let pos = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(FormatError::MissingField {
            code,
            field: "position",
        })?;
    let thrower = match parts.next() {
        None | Some("_") | Some("") => None,
        Some(name) => Some(name.to_string()),
    };
    Ok(GrenadeDetonation {
        position: parse_pos(pos)?,
        thrower,
    })
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, FormatError> {
    s.trim()
        .parse()
        .map_err(|_| FormatError::InvalidNumber(s.to_string()))
}

fn parse_pos(s: &str) -> Result<(f32, f32, f32), FormatError> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(FormatError::InvalidPosition(s.to_string()));
    }
    let coord = |p: &str| {
        p.trim()
            .parse::<f32>()
            .map_err(|_| FormatError::InvalidPosition(s.to_string()))
    };
    Ok((coord(parts[0])?, coord(parts[1])?, coord(parts[2])?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::types::{RawParticipant, Team};

    #[test]
    fn test_parse_header() {
        let record = parse_record("HD|64.000|de_mirage").unwrap();
        let Record::Header(header) = record else {
            panic!("Wrong record type");
        };
        assert_eq!(header.frame_rate, 64.0);
        assert_eq!(header.map_name, "de_mirage");
    }

    #[test]
    fn test_header_missing_map() {
        assert!(matches!(
            parse_record("HD|64.0"),
            Err(FormatError::MissingField { field: "map_name", .. })
        ));
        assert!(matches!(
            parse_record("HD|fast|de_nuke"),
            Err(FormatError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_grenade_events() {
        let Record::Event(EventKind::SmokeStart(d)) =
            parse_record("SK|-512.0,1248.5,32.0|s1mple").unwrap()
        else {
            panic!("Wrong record type");
        };
        assert_eq!(d.position, (-512.0, 1248.5, 32.0));
        assert_eq!(d.thrower.as_deref(), Some("s1mple"));

        let Record::Event(EventKind::FlashExplode(d)) = parse_record("FX|1,2,3|_").unwrap() else {
            panic!("Wrong record type");
        };
        assert_eq!(d.thrower, None);

        assert!(matches!(
            parse_record("HX|1.0,2.0"),
            Err(FormatError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_parse_structural_events() {
        assert_eq!(parse_record("RS").unwrap(), Record::Event(EventKind::RoundStart));
        assert_eq!(parse_record("MS").unwrap(), Record::Event(EventKind::MatchStart));
        assert_eq!(parse_record("GH").unwrap(), Record::Event(EventKind::HalfEnded));
        assert_eq!(parse_record("SW").unwrap(), Record::Event(EventKind::SideSwitch));
        assert_eq!(parse_record("WP").unwrap(), Record::Event(EventKind::MatchEnd));
        assert!(matches!(parse_record("ZZ|1"), Err(FormatError::UnknownCode(c)) if c == "ZZ"));
    }

    #[test]
    fn test_frame_record() {
        let frame = RawFrame {
            tick: 2048,
            participants: vec![RawParticipant {
                name: "ropz".to_string(),
                team: Team::Terrorists,
                connected: true,
                hp: 87,
                position: (10.0, 20.0, 0.0),
                last_alive_position: None,
                view_x: 45.0,
                flash_duration: 0.0,
                is_defusing: false,
                weapons: Vec::new(),
            }],
            ..Default::default()
        };
        let line = serialize_record(&Record::Frame(frame.clone()));
        assert!(line.starts_with("FR|{"));
        assert_eq!(parse_record(&line).unwrap(), Record::Frame(frame));

        assert!(matches!(
            parse_record("FR|{\"tick\":"),
            Err(FormatError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_serialize_detonation() {
        let event = EventKind::HeExplode(GrenadeDetonation {
            position: (1.0, -2.0, 3.0),
            thrower: None,
        });
        assert_eq!(serialize_record(&Record::Event(event)), "HX|1.0,-2.0,3.0|_");
    }
}
