//! Configuration snapshot and the parameter store that feeds it.
//!
//! The host keeps parameters as a flat JSON object (the shape a UI panel
//! writes). Once per frame the simulation takes a typed [`Config`] snapshot
//! and diffs it against the previous one with [`Config::changes_since`]; the
//! resulting [`ConfigChange`] list is the change feed the session applies at
//! the frame boundary.
//!
//! The `param_*` helpers never fail: a missing or mistyped key yields the
//! default. Strict validation happens only in [`ParamStore::set_param`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::color::Srgb;
use crate::error::TrailError;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing,
/// negative, fractional, or wrong type.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Like [`param_f64`], clamped into `range`.
pub fn param_f64_in(params: &Value, name: &str, default: f64, range: (f64, f64)) -> f64 {
    param_f64(params, name, default).clamp(range.0, range.1)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Extracts a hex color from `params[name]`, returning `default` if missing or unparsable.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Srgb::from_hex(s).ok())
        .unwrap_or(default)
}

/// How a jittered agent is moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterMode {
    /// Teleport anywhere on the canvas.
    #[default]
    Relocate,
    /// Offset by a small random amount around the current position.
    Nudge,
}

impl JitterMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "relocate" => Some(JitterMode::Relocate),
            "nudge" => Some(JitterMode::Nudge),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JitterMode::Relocate => "relocate",
            JitterMode::Nudge => "nudge",
        }
    }
}

// Inclusive ranges of the numeric parameters. The schema publishes them,
// `from_json` clamps into them, and `ParamStore::set_param` rejects values
// outside them.
pub const POPULATION_MAX: usize = 20_000;
pub const MAX_MODIFIERS_MAX: usize = 4096;
pub const SPEED_RANGE: (f64, f64) = (0.0, 10.0);
/// Zero is accepted and reads as 60; see [`Config::target_fps`].
pub const MAX_FPS_RANGE: (f64, f64) = (0.0, 240.0);
pub const POINT_RADIUS_RANGE: (f64, f64) = (0.0, 16.0);
pub const UNIT_RANGE: (f64, f64) = (0.0, 1.0);
pub const CHROMA_RANGE: (f64, f64) = (0.0, 0.4);
pub const MOD_RADIUS_RANGE: (f64, f64) = (1.0, 1000.0);
pub const MOD_FORCE_RANGE: (f64, f64) = (-5.0, 5.0);
pub const JITTER_MEAN_RANGE: (f64, f64) = (0.0, 60.0);
pub const JITTER_NUDGE_RANGE: (f64, f64) = (0.0, 500.0);

/// Substep rate used when `max_fps` is zero.
const DEFAULT_FPS: f64 = 60.0;

/// Typed, immutable view of every parameter the core reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target number of agents.
    pub population: usize,
    /// Speed multiplier; the integrator gain is `1000 * speed`. Zero means 1.
    pub speed: f64,
    /// Physics substep rate cap. Zero means 60.
    pub max_fps: f64,
    /// Brush radius in pixels; segment widths scale from `max(2, point_radius)`.
    pub point_radius: f64,
    /// Per-segment alpha.
    pub trail_alpha: f64,
    /// Fraction of trail paint removed per frame by the ping-pong copy.
    pub trail_decay: f64,
    pub background: Srgb,
    pub tint: Srgb,
    /// OKLCh lightness of segment colors.
    pub lightness: f64,
    /// OKLCh chroma of segment colors.
    pub chroma: f64,
    /// Radius used by pointer placement.
    pub mod_radius: f64,
    /// Attractor strength used by pointer placement.
    pub mod_strength: f64,
    /// Rotator rotation used by pointer placement.
    pub mod_rotation: f64,
    /// Modifier budget; the oldest modifiers are evicted past it.
    pub max_modifiers: usize,
    pub jitter_enabled: bool,
    /// Mean wait between jitters of one agent, in seconds.
    pub jitter_mean_s: f64,
    pub jitter_mode: JitterMode,
    /// Maximum offset for [`JitterMode::Nudge`].
    pub jitter_nudge_px: f64,
    /// Monotonic token; any change requests a trail clear.
    pub clear_token: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population: 150,
            speed: 1.0,
            max_fps: 60.0,
            point_radius: 1.6,
            trail_alpha: 0.06,
            trail_decay: 0.0,
            background: Srgb::BLACK,
            tint: Srgb::WHITE,
            lightness: 0.75,
            chroma: 0.15,
            mod_radius: 160.0,
            mod_strength: 0.8,
            mod_rotation: 0.6,
            max_modifiers: 256,
            jitter_enabled: true,
            jitter_mean_s: 0.8,
            jitter_mode: JitterMode::Relocate,
            jitter_nudge_px: 24.0,
            clear_token: 0,
        }
    }
}

/// One entry of the change feed produced by [`Config::changes_since`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigChange {
    Population(usize),
    MaxModifiers(usize),
    Background(Srgb),
    ClearRequested,
}

impl Config {
    /// Builds a snapshot from a JSON object, falling back to defaults for
    /// missing or mistyped keys.
    pub fn from_json(params: &Value) -> Self {
        let d = Config::default();
        Self {
            population: param_usize(params, "population", d.population).min(POPULATION_MAX),
            speed: param_f64_in(params, "speed", d.speed, SPEED_RANGE),
            max_fps: param_f64_in(params, "max_fps", d.max_fps, MAX_FPS_RANGE),
            point_radius: param_f64_in(params, "point_radius", d.point_radius, POINT_RADIUS_RANGE),
            trail_alpha: param_f64_in(params, "trail_alpha", d.trail_alpha, UNIT_RANGE),
            trail_decay: param_f64_in(params, "trail_decay", d.trail_decay, UNIT_RANGE),
            background: param_color(params, "background", d.background),
            tint: param_color(params, "tint", d.tint),
            lightness: param_f64_in(params, "lightness", d.lightness, UNIT_RANGE),
            chroma: param_f64_in(params, "chroma", d.chroma, CHROMA_RANGE),
            mod_radius: param_f64_in(params, "mod_radius", d.mod_radius, MOD_RADIUS_RANGE),
            mod_strength: param_f64_in(params, "mod_strength", d.mod_strength, MOD_FORCE_RANGE),
            mod_rotation: param_f64_in(params, "mod_rotation", d.mod_rotation, MOD_FORCE_RANGE),
            max_modifiers: param_usize(params, "max_modifiers", d.max_modifiers)
                .min(MAX_MODIFIERS_MAX),
            jitter_enabled: param_bool(params, "jitter_enabled", d.jitter_enabled),
            jitter_mean_s: param_f64_in(params, "jitter_mean_s", d.jitter_mean_s, JITTER_MEAN_RANGE),
            jitter_mode: JitterMode::from_name(&param_string(
                params,
                "jitter_mode",
                d.jitter_mode.name(),
            ))
            .unwrap_or(d.jitter_mode),
            jitter_nudge_px: param_f64_in(
                params,
                "jitter_nudge_px",
                d.jitter_nudge_px,
                JITTER_NUDGE_RANGE,
            ),
            clear_token: params
                .get("clear_token")
                .and_then(Value::as_u64)
                .unwrap_or(d.clear_token),
        }
    }

    /// The snapshot as a flat JSON object, keyed like [`Config::from_json`].
    pub fn to_json(&self) -> Value {
        json!({
            "population": self.population,
            "speed": self.speed,
            "max_fps": self.max_fps,
            "point_radius": self.point_radius,
            "trail_alpha": self.trail_alpha,
            "trail_decay": self.trail_decay,
            "background": self.background.to_hex(),
            "tint": self.tint.to_hex(),
            "lightness": self.lightness,
            "chroma": self.chroma,
            "mod_radius": self.mod_radius,
            "mod_strength": self.mod_strength,
            "mod_rotation": self.mod_rotation,
            "max_modifiers": self.max_modifiers,
            "jitter_enabled": self.jitter_enabled,
            "jitter_mean_s": self.jitter_mean_s,
            "jitter_mode": self.jitter_mode.name(),
            "jitter_nudge_px": self.jitter_nudge_px,
            "clear_token": self.clear_token,
        })
    }

    /// Integrator gain: `1000 * speed`, with a zero speed read as 1.
    pub fn gain(&self) -> f32 {
        let speed = if self.speed == 0.0 { 1.0 } else { self.speed };
        (1000.0 * speed) as f32
    }

    /// Substep rate: a non-positive cap reads as 60, and no cap exceeds the
    /// top of [`MAX_FPS_RANGE`] even when the struct was built by hand.
    pub fn target_fps(&self) -> f64 {
        if self.max_fps > 0.0 {
            self.max_fps.min(MAX_FPS_RANGE.1)
        } else {
            DEFAULT_FPS
        }
    }

    /// Lists what changed relative to `prev` that the core must act on.
    pub fn changes_since(&self, prev: &Config) -> Vec<ConfigChange> {
        let mut changes = Vec::new();
        if self.population != prev.population {
            changes.push(ConfigChange::Population(self.population));
        }
        if self.max_modifiers != prev.max_modifiers {
            changes.push(ConfigChange::MaxModifiers(self.max_modifiers));
        }
        if self.background != prev.background {
            changes.push(ConfigChange::Background(self.background));
        }
        if self.clear_token != prev.clear_token {
            changes.push(ConfigChange::ClearRequested);
        }
        changes
    }

    /// Schema describing every parameter: type, default, range, description.
    pub fn param_schema() -> Value {
        let d = Config::default();
        json!({
            "population": {"type": "integer", "default": d.population, "min": 0, "max": POPULATION_MAX,
                "description": "Target number of agents"},
            "speed": {"type": "number", "default": d.speed, "min": SPEED_RANGE.0, "max": SPEED_RANGE.1,
                "description": "Speed multiplier; integrator gain is 1000 * speed"},
            "max_fps": {"type": "number", "default": d.max_fps, "min": MAX_FPS_RANGE.0, "max": MAX_FPS_RANGE.1,
                "description": "Physics substep rate cap; 0 means 60"},
            "point_radius": {"type": "number", "default": d.point_radius, "min": POINT_RADIUS_RANGE.0, "max": POINT_RADIUS_RANGE.1,
                "description": "Brush radius in pixels"},
            "trail_alpha": {"type": "number", "default": d.trail_alpha, "min": UNIT_RANGE.0, "max": UNIT_RANGE.1,
                "description": "Alpha of each painted segment"},
            "trail_decay": {"type": "number", "default": d.trail_decay, "min": UNIT_RANGE.0, "max": UNIT_RANGE.1,
                "description": "Fraction of trail paint removed per frame"},
            "background": {"type": "color", "default": d.background.to_hex(),
                "description": "Background color behind the trail"},
            "tint": {"type": "color", "default": d.tint.to_hex(),
                "description": "Color multiplied into every segment"},
            "lightness": {"type": "number", "default": d.lightness, "min": UNIT_RANGE.0, "max": UNIT_RANGE.1,
                "description": "OKLCh lightness of segment colors"},
            "chroma": {"type": "number", "default": d.chroma, "min": CHROMA_RANGE.0, "max": CHROMA_RANGE.1,
                "description": "OKLCh chroma of segment colors"},
            "mod_radius": {"type": "number", "default": d.mod_radius, "min": MOD_RADIUS_RANGE.0, "max": MOD_RADIUS_RANGE.1,
                "description": "Radius of placed modifiers"},
            "mod_strength": {"type": "number", "default": d.mod_strength, "min": MOD_FORCE_RANGE.0, "max": MOD_FORCE_RANGE.1,
                "description": "Strength of placed attractors"},
            "mod_rotation": {"type": "number", "default": d.mod_rotation, "min": MOD_FORCE_RANGE.0, "max": MOD_FORCE_RANGE.1,
                "description": "Rotation of placed rotators"},
            "max_modifiers": {"type": "integer", "default": d.max_modifiers, "min": 0, "max": MAX_MODIFIERS_MAX,
                "description": "Modifier budget; oldest are evicted first"},
            "jitter_enabled": {"type": "boolean", "default": d.jitter_enabled,
                "description": "Periodically teleport agents"},
            "jitter_mean_s": {"type": "number", "default": d.jitter_mean_s, "min": JITTER_MEAN_RANGE.0, "max": JITTER_MEAN_RANGE.1,
                "description": "Mean seconds between jitters of one agent"},
            "jitter_mode": {"type": "string", "default": d.jitter_mode.name(),
                "options": ["relocate", "nudge"],
                "description": "Teleport anywhere or offset locally"},
            "jitter_nudge_px": {"type": "number", "default": d.jitter_nudge_px, "min": JITTER_NUDGE_RANGE.0, "max": JITTER_NUDGE_RANGE.1,
                "description": "Maximum nudge offset in pixels"},
            "clear_token": {"type": "integer", "default": d.clear_token,
                "description": "Bump to clear the trail"}
        })
    }
}

/// In-process parameter store: the writer side of the configuration.
///
/// UI code calls [`ParamStore::set_param`]; the frame loop calls
/// [`ParamStore::snapshot`] once per frame.
#[derive(Debug, Clone)]
pub struct ParamStore {
    values: Map<String, Value>,
    revision: u64,
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ParamStore {
    pub fn new(initial: Config) -> Self {
        let values = match initial.to_json() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            values,
            revision: 0,
        }
    }

    /// Sets one parameter after checking it against the schema.
    pub fn set_param(&mut self, name: &str, value: Value) -> Result<(), TrailError> {
        let schema = Config::param_schema();
        let entry = schema
            .get(name)
            .ok_or_else(|| TrailError::UnknownParam(name.to_owned()))?;
        let expected = entry["type"].as_str().unwrap_or("number");
        let ok = match expected {
            "integer" => value.as_u64().is_some(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "color" => match value.as_str() {
                Some(s) => Srgb::from_hex(s).map(|_| true)?,
                None => false,
            },
            "string" => match (value.as_str(), name) {
                (Some(s), "jitter_mode") => JitterMode::from_name(s).is_some(),
                (Some(_), _) => true,
                (None, _) => false,
            },
            _ => false,
        };
        if !ok {
            return Err(TrailError::ParamTypeMismatch {
                name: name.to_owned(),
                expected: expected.to_owned(),
                got: json_type_name(&value).to_owned(),
            });
        }
        if let (Some(v), Some(min), Some(max)) = (
            value.as_f64(),
            entry.get("min").and_then(Value::as_f64),
            entry.get("max").and_then(Value::as_f64),
        ) {
            if !(min..=max).contains(&v) {
                return Err(TrailError::ParamOutOfRange {
                    name: name.to_owned(),
                    value: v,
                    min,
                    max,
                });
            }
        }
        self.values.insert(name.to_owned(), value);
        self.revision += 1;
        Ok(())
    }

    /// Bumps the clear token, requesting a trail clear on the next frame.
    pub fn request_clear(&mut self) {
        let next = self
            .values
            .get("clear_token")
            .and_then(Value::as_u64)
            .unwrap_or(0)
            + 1;
        self.values.insert("clear_token".into(), json!(next));
        self.revision += 1;
    }

    /// Number of successful writes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Config {
        Config::from_json(&Value::Object(self.values.clone()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_fall_back_on_missing_and_mistyped_keys() {
        let params = json!({"speed": "fast", "count": -1, "on": 1, "name": 3});
        assert_eq!(param_f64(&params, "speed", 1.5), 1.5);
        assert_eq!(param_f64(&params, "absent", 2.0), 2.0);
        assert_eq!(param_usize(&params, "count", 5), 5);
        assert!(param_bool(&params, "on", true));
        assert_eq!(param_string(&params, "name", "x"), "x");
    }

    #[test]
    fn helpers_read_present_values() {
        let params = json!({"speed": 2, "count": 42, "on": false, "name": "nudge"});
        assert_eq!(param_f64(&params, "speed", 0.0), 2.0);
        assert_eq!(param_usize(&params, "count", 0), 42);
        assert!(!param_bool(&params, "on", true));
        assert_eq!(param_string(&params, "name", ""), "nudge");
    }

    #[test]
    fn param_color_rejects_bad_hex() {
        let params = json!({"bg": "#12345", "fg": "#ff0000"});
        assert_eq!(param_color(&params, "bg", Srgb::WHITE), Srgb::WHITE);
        assert_eq!(param_color(&params, "fg", Srgb::BLACK).to_packed(), 0xff0000);
    }

    #[test]
    fn from_empty_json_is_default() {
        assert_eq!(Config::from_json(&json!({})), Config::default());
    }

    #[test]
    fn to_json_from_json_round_trip() {
        let mut cfg = Config::default();
        cfg.population = 999;
        cfg.jitter_mode = JitterMode::Nudge;
        cfg.background = Srgb::from_packed(0x102030);
        cfg.clear_token = 4;
        assert_eq!(Config::from_json(&cfg.to_json()), cfg);
    }

    #[test]
    fn from_json_clamps_alpha_and_decay() {
        let cfg = Config::from_json(&json!({"trail_alpha": 3.0, "trail_decay": -1.0}));
        assert_eq!(cfg.trail_alpha, 1.0);
        assert_eq!(cfg.trail_decay, 0.0);
    }

    #[test]
    fn zero_speed_and_fps_fall_back() {
        let cfg = Config::from_json(&json!({"speed": 0.0, "max_fps": 0.0}));
        assert_eq!(cfg.gain(), 1000.0);
        assert_eq!(cfg.target_fps(), 60.0);
        let fast = Config::from_json(&json!({"speed": 2.5, "max_fps": 120}));
        assert_eq!(fast.gain(), 2500.0);
        assert_eq!(fast.target_fps(), 120.0);
    }

    #[test]
    fn from_json_clamps_ranged_params_to_schema() {
        let cfg = Config::from_json(&json!({
            "max_fps": 1e9,
            "speed": 99.0,
            "population": 1_000_000,
            "max_modifiers": 100_000,
            "jitter_nudge_px": -4.0,
        }));
        assert_eq!(cfg.max_fps, MAX_FPS_RANGE.1);
        assert_eq!(cfg.target_fps(), 240.0);
        assert_eq!(cfg.speed, SPEED_RANGE.1);
        assert_eq!(cfg.population, POPULATION_MAX);
        assert_eq!(cfg.max_modifiers, MAX_MODIFIERS_MAX);
        assert_eq!(cfg.jitter_nudge_px, 0.0);
    }

    #[test]
    fn target_fps_is_capped_for_hand_built_configs() {
        let cfg = Config {
            max_fps: 2e6,
            ..Config::default()
        };
        assert_eq!(cfg.target_fps(), MAX_FPS_RANGE.1);
    }

    #[test]
    fn store_rejects_out_of_range_numbers() {
        let mut store = ParamStore::default();
        for (name, value) in [
            ("max_fps", json!(1e9)),
            ("max_fps", json!(-1.0)),
            ("population", json!(20_001)),
            ("max_modifiers", json!(5000)),
            ("trail_alpha", json!(1.5)),
        ] {
            assert!(
                matches!(
                    store.set_param(name, value.clone()),
                    Err(TrailError::ParamOutOfRange { .. })
                ),
                "{name} = {value} accepted"
            );
        }
        assert_eq!(store.revision(), 0);
        assert_eq!(store.snapshot(), Config::default());
    }

    #[test]
    fn store_accepts_range_endpoints() {
        let mut store = ParamStore::default();
        store.set_param("max_fps", json!(240.0)).unwrap();
        store.set_param("max_fps", json!(0)).unwrap();
        store.set_param("population", json!(POPULATION_MAX)).unwrap();
        store.set_param("max_modifiers", json!(0)).unwrap();
        let cfg = store.snapshot();
        assert_eq!(cfg.target_fps(), 60.0);
        assert_eq!(cfg.population, POPULATION_MAX);
        assert_eq!(cfg.max_modifiers, 0);
    }

    #[test]
    fn schema_ranges_contain_defaults() {
        let schema = Config::param_schema();
        for (key, entry) in schema.as_object().unwrap() {
            if let (Some(min), Some(max), Some(d)) = (
                entry["min"].as_f64(),
                entry["max"].as_f64(),
                entry["default"].as_f64(),
            ) {
                assert!((min..=max).contains(&d), "{key} default {d} outside range");
            }
        }
    }

    #[test]
    fn schema_covers_every_serialized_key() {
        let schema = Config::param_schema();
        let values = Config::default().to_json();
        for key in values.as_object().unwrap().keys() {
            let entry = schema.get(key).unwrap_or_else(|| panic!("schema missing {key}"));
            assert!(entry.get("type").is_some(), "{key} missing 'type'");
            assert!(entry.get("default").is_some(), "{key} missing 'default'");
            assert!(entry.get("description").is_some(), "{key} missing 'description'");
        }
    }

    #[test]
    fn changes_since_reports_only_actionable_fields() {
        let prev = Config::default();
        let mut next = prev.clone();
        next.speed = 3.0;
        assert!(next.changes_since(&prev).is_empty());

        next.population = 10;
        next.max_modifiers = 2;
        next.clear_token = 1;
        let changes = next.changes_since(&prev);
        assert_eq!(
            changes,
            vec![
                ConfigChange::Population(10),
                ConfigChange::MaxModifiers(2),
                ConfigChange::ClearRequested,
            ]
        );
    }

    #[test]
    fn store_set_param_updates_snapshot_and_revision() {
        let mut store = ParamStore::default();
        store.set_param("population", json!(500)).unwrap();
        store.set_param("jitter_mode", json!("nudge")).unwrap();
        store.set_param("background", json!("#203040")).unwrap();
        let cfg = store.snapshot();
        assert_eq!(cfg.population, 500);
        assert_eq!(cfg.jitter_mode, JitterMode::Nudge);
        assert_eq!(cfg.background.to_packed(), 0x203040);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn store_rejects_unknown_and_mistyped_params() {
        let mut store = ParamStore::default();
        assert!(matches!(
            store.set_param("warp", json!(1)),
            Err(TrailError::UnknownParam(_))
        ));
        assert!(matches!(
            store.set_param("population", json!(-3)),
            Err(TrailError::ParamTypeMismatch { .. })
        ));
        assert!(matches!(
            store.set_param("jitter_enabled", json!("yes")),
            Err(TrailError::ParamTypeMismatch { .. })
        ));
        assert!(matches!(
            store.set_param("jitter_mode", json!("spin")),
            Err(TrailError::ParamTypeMismatch { .. })
        ));
        assert!(matches!(
            store.set_param("tint", json!("#zzzzzz")),
            Err(TrailError::InvalidColor(_))
        ));
        assert_eq!(store.revision(), 0);
        assert_eq!(store.snapshot(), Config::default());
    }

    #[test]
    fn request_clear_bumps_token_monotonically() {
        let mut store = ParamStore::default();
        let before = store.snapshot();
        store.request_clear();
        store.request_clear();
        let after = store.snapshot();
        assert_eq!(after.clear_token, before.clear_token + 2);
        assert_eq!(
            after.changes_since(&before),
            vec![ConfigChange::ClearRequested]
        );
    }
}
