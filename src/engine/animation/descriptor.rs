// Parser for line-oriented `.animation` descriptors
//
// One directive per line, attributes as key="value" pairs:
//
//   VERSION="1.0"
//   animation state="PLAYER_IDLE"
//   frame duration="0.1" x="0" y="0" w="30" h="48" originx="15" originy="48"
//   point label="BUSTER" x="28" y="20"
//
// `VERSION="1.0"` switches to legacy coordinates: `animation` carries
// width/height and `frame` uses startx/starty without an origin.
//
// Parsing never fails. Missing or malformed values read as 0 and
// unrecognized lines are skipped.

use super::frame::FrameList;
use crate::core::math::{parse_leading_f32, parse_leading_i32, IntRect};
use glam::Vec2;
use log::{debug, warn};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Version,
    Animation,
    Frame,
    Point,
}

impl Directive {
    fn of(line: &str) -> Option<Self> {
        let keyword = line
            .split(|c: char| c.is_whitespace() || c == '=')
            .next()
            .unwrap_or_default();

        match keyword {
            "VERSION" => Some(Self::Version),
            "animation" => Some(Self::Animation),
            "frame" => Some(Self::Frame),
            "point" => Some(Self::Point),
            _ => None,
        }
    }
}

/// Extract the quoted value of `key="..."` from a line.
///
/// The key must start the line or follow whitespace, so `x` does not match
/// inside `startx`. Returns an empty string when the key is absent.
pub fn value_of<'a>(key: &str, line: &'a str) -> &'a str {
    let pattern = format!("{}=\"", key);

    for (index, _) in line.match_indices(&pattern) {
        let at_boundary = line[..index]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);

        if !at_boundary {
            continue;
        }

        let rest = &line[index + pattern.len()..];
        return rest.split('"').next().unwrap_or_default();
    }

    ""
}

/// Parse descriptor text into a table of upper-cased state name to frames
pub fn parse(text: &str) -> HashMap<String, FrameList> {
    let mut animations = HashMap::new();
    let mut current: Option<(String, FrameList)> = None;
    let mut legacy = false;
    let mut width = 0;
    let mut height = 0;

    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim();

        let Some(directive) = Directive::of(line) else {
            continue;
        };

        match directive {
            Directive::Version => {
                legacy = value_of("VERSION", line) == "1.0";
            }
            Directive::Animation => {
                if let Some((state, frames)) = current.take() {
                    insert_animation(&mut animations, state, frames);
                }

                let state = value_of("state", line).to_uppercase();

                if legacy {
                    width = parse_leading_i32(value_of("width", line));
                    height = parse_leading_i32(value_of("height", line));
                }

                current = Some((state, FrameList::new()));
            }
            Directive::Frame => {
                let Some((_, frames)) = current.as_mut() else {
                    debug!("Line {}: frame outside of an animation", line_number + 1);
                    continue;
                };

                // Durations are never negative
                let duration = parse_leading_f32(value_of("duration", line)).max(0.0);

                if legacy {
                    let x = parse_leading_i32(value_of("startx", line));
                    let y = parse_leading_i32(value_of("starty", line));
                    frames.add(duration, IntRect::new(x, y, width, height));
                } else {
                    let x = parse_leading_i32(value_of("x", line));
                    let y = parse_leading_i32(value_of("y", line));
                    width = parse_leading_i32(value_of("w", line));
                    height = parse_leading_i32(value_of("h", line));
                    let origin = Vec2::new(
                        parse_leading_i32(value_of("originx", line)) as f32,
                        parse_leading_i32(value_of("originy", line)) as f32,
                    );
                    frames.add_with_origin(duration, IntRect::new(x, y, width, height), origin);
                }
            }
            Directive::Point => {
                let Some((_, frames)) = current.as_mut() else {
                    debug!("Line {}: point outside of an animation", line_number + 1);
                    continue;
                };

                let label = value_of("label", line).to_uppercase();
                let x = parse_leading_i32(value_of("x", line));
                let y = parse_leading_i32(value_of("y", line));

                if !frames.set_point(label, x, y) {
                    debug!("Line {}: point before any frame", line_number + 1);
                }
            }
        }
    }

    if let Some((state, frames)) = current {
        insert_animation(&mut animations, state, frames);
    }

    animations
}

fn insert_animation(animations: &mut HashMap<String, FrameList>, state: String, frames: FrameList) {
    if animations.contains_key(&state) {
        warn!("Duplicate animation state {}, keeping the first", state);
        return;
    }
    animations.insert(state, frames);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::IVec2;

    const DESCRIPTOR: &str = r#"
animation state="PLAYER_IDLE"
frame duration="0.1" x="0" y="0" w="30" h="48" originx="15" originy="48"
frame duration="0.1" x="30" y="0" w="30" h="48" originx="15" originy="48"

animation state="player_shooting"
frame duration="0.05" x="0" y="48" w="40" h="48" originx="15" originy="48"
point label="buster" x="34" y="20"
frame duration="0.15" x="40" y="48" w="40" h="48" originx="15" originy="48"
point label="BUSTER" x="36" y="21"
"#;

    #[test]
    fn test_value_of() {
        let line = r#"frame duration="0.1" startx="5" x="7" originx="9""#;
        assert_eq!(value_of("duration", line), "0.1");
        assert_eq!(value_of("x", line), "7");
        assert_eq!(value_of("startx", line), "5");
        assert_eq!(value_of("originx", line), "9");
        assert_eq!(value_of("y", line), "");
        assert_eq!(value_of("VERSION", r#"VERSION="1.0""#), "1.0");
    }

    #[test]
    fn test_value_of_unterminated() {
        assert_eq!(value_of("state", r#"animation state="IDLE"#), "IDLE");
    }

    #[test]
    fn test_parse_frames_and_points() {
        let animations = parse(DESCRIPTOR);
        assert_eq!(animations.len(), 2);

        let idle = &animations["PLAYER_IDLE"];
        assert_eq!(idle.frame_count(), 2);
        assert_relative_eq!(idle.total_duration(), 0.2);

        let first = idle.frame(0).unwrap();
        assert_eq!(first.subregion, IntRect::new(0, 0, 30, 48));
        assert!(first.apply_origin);
        assert_eq!(first.origin, Vec2::new(15.0, 48.0));

        let shooting = &animations["PLAYER_SHOOTING"];
        assert_eq!(shooting.frame_count(), 2);
        assert_eq!(
            shooting.frame(0).unwrap().points.get("BUSTER"),
            Some(&IVec2::new(34, 20))
        );
        assert_eq!(
            shooting.frame(1).unwrap().points.get("BUSTER"),
            Some(&IVec2::new(36, 21))
        );
    }

    #[test]
    fn test_parse_legacy() {
        let text = r#"VERSION="1.0"
animation state="MOVE" width="20" height="30"
frame duration="0.2" startx="0" starty="10"
frame duration="0.3" startx="20" starty="10"
"#;
        let animations = parse(text);
        let list = &animations["MOVE"];

        assert_eq!(list.frame_count(), 2);
        assert_eq!(list.frame(1).unwrap().subregion, IntRect::new(20, 10, 20, 30));
        assert!(!list.frame(0).unwrap().apply_origin);
        assert_relative_eq!(list.total_duration(), 0.5);
    }

    #[test]
    fn test_parse_is_lenient() {
        let text = r#"
# comment line
point label="EARLY" x="1" y="1"
frame duration="0.1" x="1"
animation state="BROKEN"
point label="TOO_EARLY" x="1" y="1"
frame duration="abc" x="oops" w="16"
something else entirely
"#;
        let animations = parse(text);
        assert_eq!(animations.len(), 1);

        let broken = &animations["BROKEN"];
        assert_eq!(broken.frame_count(), 1);
        let frame = broken.frame(0).unwrap();
        assert_eq!(frame.duration, 0.0);
        assert_eq!(frame.subregion, IntRect::new(0, 0, 16, 0));
        assert!(frame.points.is_empty());
    }

    #[test]
    fn test_parse_empty_and_duplicates() {
        assert!(parse("").is_empty());

        let text = r#"
animation state="A"
frame duration="1.0" x="0" y="0" w="8" h="8"
animation state="a"
frame duration="2.0" x="8" y="0" w="8" h="8"
frame duration="2.0" x="8" y="0" w="8" h="8"
animation state="EMPTY"
"#;
        let animations = parse(text);
        assert_eq!(animations["A"].frame_count(), 1);
        assert!(animations["EMPTY"].is_empty());
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let text = "animation state=\"IDLE\"\r\nframe duration=\"0.5\" x=\"1\" y=\"2\" w=\"3\" h=\"4\"\r\n";
        let animations = parse(text);
        assert_eq!(
            animations["IDLE"].frame(0).unwrap().subregion,
            IntRect::new(1, 2, 3, 4)
        );
    }

    #[test]
    fn test_negative_duration_reads_as_zero() {
        let text = r#"
animation state="GLITCH"
frame duration="-0.5" x="0" y="0" w="8" h="8"
frame duration="0.25" x="8" y="0" w="8" h="8"
"#;
        let animations = parse(text);
        let glitch = &animations["GLITCH"];
        assert_eq!(glitch.frame(0).unwrap().duration, 0.0);
        assert_relative_eq!(glitch.total_duration(), 0.25);
    }
}
