//! Synthetic recording generator - writes a playable `.dlog` without a real demo
//!
//! Ten players wander the map, grenades go off at random, rounds and the
//! half switch are announced the way an export would. One frame record is
//! deliberately truncated so the skip path gets exercised.
//!
//! Usage:
//!   cargo run --bin synth -- --rounds 6 --seed 7 --out demo.dlog
//!   cargo run --bin synth -- --map de_mirage --frame-rate 32 > demo.dlog

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use demoview::constants::RADAR_SIZE;
use demoview::demo::{
    Equipment, EventKind, GrenadeDetonation, RawBomb, RawFrame, RawGrenade, RawInferno,
    RawParticipant, RawTeam, Record, SessionHeader, Team, Weapon, serialize_record,
};
use demoview::maps::{MapCatalog, MapOverview};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUND_SECS: f64 = 25.0;
const GAME_TICK_RATE: f64 = 128.0;
const PLAYERS_PER_TEAM: usize = 5;
const CORRUPT_FRAME: usize = 5;

struct SynthConfig {
    rounds: usize,
    seed: u64,
    frame_rate: f64,
    map: String,
    out: Option<String>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            rounds: 4,
            seed: 42,
            frame_rate: 64.0,
            map: "de_dust2".to_string(),
            out: None,
        }
    }
}

impl SynthConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--rounds" => {
                    if i + 1 < args.len() {
                        config.rounds = args[i + 1].parse().unwrap_or(config.rounds);
                        i += 1;
                    }
                }
                "--seed" => {
                    if i + 1 < args.len() {
                        config.seed = args[i + 1].parse().unwrap_or(config.seed);
                        i += 1;
                    }
                }
                "--frame-rate" => {
                    if i + 1 < args.len() {
                        config.frame_rate = args[i + 1]
                            .parse()
                            .ok()
                            .filter(|r: &f64| r.is_finite() && *r > 0.0)
                            .unwrap_or(config.frame_rate);
                        i += 1;
                    }
                }
                "--map" => {
                    if i + 1 < args.len() {
                        config.map = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--out" => {
                    if i + 1 < args.len() {
                        config.out = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                other => eprintln!("Ignoring unknown argument: {}", other),
            }
            i += 1;
        }

        config.rounds = config.rounds.max(1);
        config
    }
}

/// Playable area of the radar in game coordinates (inner 60%)
struct Area {
    min: (f32, f32),
    max: (f32, f32),
}

impl Area {
    fn of(map: &MapOverview) -> Self {
        let extent = RADAR_SIZE * map.scale;
        Self {
            min: (map.pos_x + extent * 0.2, map.pos_y - extent * 0.8),
            max: (map.pos_x + extent * 0.8, map.pos_y - extent * 0.2),
        }
    }

    fn random_point(&self, rng: &mut StdRng) -> (f32, f32) {
        (
            rng.gen_range(self.min.0..self.max.0),
            rng.gen_range(self.min.1..self.max.1),
        )
    }

    fn clamp(&self, p: (f32, f32)) -> (f32, f32) {
        (p.0.clamp(self.min.0, self.max.0), p.1.clamp(self.min.1, self.max.1))
    }
}

struct SimPlayer {
    name: String,
    team: Team,
    position: (f32, f32),
    view: f32,
    hp: i32,
    flash_duration: f32,
}

impl SimPlayer {
    fn to_raw(&self, carries_bomb: bool) -> RawParticipant {
        let mut weapons = vec![
            Equipment {
                weapon: Weapon::Knife,
                ammo: 0,
            },
            Equipment {
                weapon: Weapon::Rifle,
                ammo: 30,
            },
        ];
        if carries_bomb {
            weapons.push(Equipment {
                weapon: Weapon::Bomb,
                ammo: 0,
            });
        }
        RawParticipant {
            name: self.name.clone(),
            team: self.team,
            connected: true,
            hp: self.hp.max(0),
            position: (self.position.0, self.position.1, 0.0),
            last_alive_position: None,
            view_x: self.view,
            flash_duration: self.flash_duration,
            is_defusing: false,
            weapons,
        }
    }
}

fn spawn_players(area: &Area, rng: &mut StdRng) -> Vec<SimPlayer> {
    let mut players = Vec::with_capacity(PLAYERS_PER_TEAM * 2);
    for (prefix, team) in [("ct", Team::CounterTerrorists), ("t", Team::Terrorists)] {
        let base = area.random_point(rng);
        for n in 1..=PLAYERS_PER_TEAM {
            players.push(SimPlayer {
                name: format!("{}_player{}", prefix, n),
                team,
                position: area.clamp((
                    base.0 + rng.gen_range(-150.0..150.0_f32),
                    base.1 + rng.gen_range(-150.0..150.0_f32),
                )),
                view: rng.gen_range(0.0..360.0),
                hp: 100,
                flash_duration: 0.0,
            });
        }
    }
    players
}

/// Everything that carries over between rounds
struct Match {
    area: Area,
    rng: StdRng,
    tick: i32,
    tick_step: i32,
    frames_written: usize,
    ct: RawTeam,
    t: RawTeam,
}

impl Match {
    fn emit(&self, out: &mut impl Write, record: Record) -> io::Result<()> {
        writeln!(out, "{}", serialize_record(&record))
    }

    fn detonation(&mut self, players: &[SimPlayer]) -> GrenadeDetonation {
        let thrower = &players[self.rng.gen_range(0..players.len())];
        let spread: f32 = self.rng.gen_range(100.0..400.0);
        let angle: f32 = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let at = self.area.clamp((
            thrower.position.0 + spread * angle.cos(),
            thrower.position.1 + spread * angle.sin(),
        ));
        GrenadeDetonation {
            position: (at.0, at.1, 0.0),
            thrower: Some(thrower.name.clone()),
        }
    }

    fn play_round(&mut self, out: &mut impl Write, frame_rate: f64) -> io::Result<()> {
        self.emit(out, Record::Event(EventKind::RoundStart))?;

        let mut players = spawn_players(&self.area, &mut self.rng);
        let frames = (ROUND_SECS * frame_rate).round() as usize;
        let carrier = players
            .iter()
            .position(|p| p.team == Team::Terrorists)
            .unwrap_or(0);
        let drop_frame = if frames >= 3 {
            self.rng.gen_range(frames / 3..frames * 2 / 3)
        } else {
            frames
        };
        let mut dropped_at: Option<(f32, f32)> = None;
        let mut inferno: Option<(RawInferno, usize)> = None;
        let step = (250.0 / frame_rate) as f32;

        for frame in 0..frames {
            for p in players.iter_mut().filter(|p| p.hp > 0) {
                p.view = (p.view + self.rng.gen_range(-8.0..8.0_f32)).rem_euclid(360.0);
                let heading = p.view.to_radians();
                p.position = self.area.clamp((
                    p.position.0 + step * heading.cos(),
                    p.position.1 + step * heading.sin(),
                ));
                p.flash_duration = (p.flash_duration - 1.0 / frame_rate as f32).max(0.0);
                // Late in the round people start dying
                if frame > frames / 2 && self.rng.gen_bool(0.002) {
                    p.hp -= self.rng.gen_range(30..120);
                }
            }

            if frame == drop_frame {
                dropped_at = Some(players[carrier].position);
            }

            let bomb = match dropped_at {
                Some(at) => RawBomb {
                    position: (at.0, at.1, 0.0),
                    carrier: None,
                },
                None => {
                    let p = &players[carrier];
                    RawBomb {
                        position: (p.position.0, p.position.1, 0.0),
                        carrier: Some(p.name.clone()),
                    }
                }
            };

            let mut grenades = Vec::new();
            if self.rng.gen_bool(0.01) {
                let d = self.detonation(&players);
                grenades.push(RawGrenade {
                    weapon: Weapon::Decoy,
                    position: d.position,
                });
            }

            if inferno.is_none() && self.rng.gen_bool(0.002) {
                let center = self.detonation(&players).position;
                let fires = (0..8)
                    .map(|_| {
                        (
                            center.0 + self.rng.gen_range(-120.0..120.0_f32),
                            center.1 + self.rng.gen_range(-120.0..120.0_f32),
                        )
                    })
                    .collect();
                inferno = Some((RawInferno { fires }, (7.0 * frame_rate) as usize));
            }
            let infernos = match inferno.as_mut() {
                Some((fire, remaining)) if *remaining > 0 => {
                    *remaining -= 1;
                    vec![fire.clone()]
                }
                _ => Vec::new(),
            };

            let raw = RawFrame {
                tick: self.tick,
                participants: players
                    .iter()
                    .enumerate()
                    .map(|(i, p)| p.to_raw(i == carrier && dropped_at.is_none()))
                    .collect(),
                grenades,
                infernos,
                bomb,
                ct: self.ct.clone(),
                t: self.t.clone(),
            };

            if self.frames_written == CORRUPT_FRAME {
                // Truncated mid-record, as a crashed exporter leaves it
                writeln!(out, "FR|{{\"tick\":{},\"participants\":[", self.tick)?;
            } else {
                self.emit(out, Record::Frame(raw))?;
            }
            self.frames_written += 1;
            self.tick += self.tick_step;

            // Grenade events follow the frame they happened on
            if self.rng.gen_bool(0.004) {
                let d = self.detonation(&players);
                for p in players.iter_mut() {
                    let dx = p.position.0 - d.position.0;
                    let dy = p.position.1 - d.position.1;
                    if dx * dx + dy * dy < 400.0 * 400.0 {
                        p.flash_duration = 3.0;
                    }
                }
                self.emit(out, Record::Event(EventKind::FlashExplode(d)))?;
            }
            if self.rng.gen_bool(0.003) {
                let d = self.detonation(&players);
                self.emit(out, Record::Event(EventKind::HeExplode(d)))?;
            }
            if self.rng.gen_bool(0.003) {
                let d = self.detonation(&players);
                self.emit(out, Record::Event(EventKind::SmokeStart(d)))?;
            }
        }

        let ct_alive = players
            .iter()
            .filter(|p| p.team == Team::CounterTerrorists && p.hp > 0)
            .count();
        let t_alive = players
            .iter()
            .filter(|p| p.team == Team::Terrorists && p.hp > 0)
            .count();
        if ct_alive >= t_alive {
            self.ct.score += 1;
        } else {
            self.t.score += 1;
        }
        Ok(())
    }
}

fn write_recording(config: &SynthConfig, map: &MapOverview, out: &mut impl Write) -> io::Result<()> {
    let mut game = Match {
        area: Area::of(map),
        rng: StdRng::seed_from_u64(config.seed),
        tick: 1000,
        tick_step: (GAME_TICK_RATE / config.frame_rate).round().max(1.0) as i32,
        frames_written: 0,
        ct: RawTeam {
            score: 0,
            clan: "Blue".to_string(),
        },
        t: RawTeam {
            score: 0,
            clan: "Orange".to_string(),
        },
    };

    writeln!(
        out,
        "# synthesized {} seed {} rounds {}",
        chrono::Utc::now().to_rfc3339(),
        config.seed,
        config.rounds
    )?;
    game.emit(
        out,
        Record::Header(SessionHeader {
            frame_rate: config.frame_rate,
            map_name: config.map.clone(),
        }),
    )?;
    game.emit(out, Record::Event(EventKind::MatchStart))?;

    let half = config.rounds / 2;
    for round in 0..config.rounds {
        if round == half && round > 0 {
            game.emit(out, Record::Event(EventKind::HalfEnded))?;
            game.emit(out, Record::Event(EventKind::SideSwitch))?;
            std::mem::swap(&mut game.ct, &mut game.t);
        }
        game.play_round(out, config.frame_rate)?;
    }

    game.emit(out, Record::Event(EventKind::MatchEnd))?;
    out.flush()
}

fn main() -> ExitCode {
    let config = SynthConfig::from_args();

    let catalog = MapCatalog::builtin();
    let map = match catalog.get(&config.map) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match &config.out {
        Some(path) => match File::create(path) {
            Ok(file) => write_recording(&config, map, &mut BufWriter::new(file)),
            Err(e) => Err(e),
        },
        None => write_recording(&config, map, &mut BufWriter::new(io::stdout().lock())),
    };

    match result {
        Ok(()) => {
            if let Some(path) = &config.out {
                eprintln!("Wrote {} rounds to {}", config.rounds, path);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write recording: {}", e);
            ExitCode::FAILURE
        }
    }
}
