//! Emitter configuration: defaults, TOML parsing and TOML output

use crate::render::ParticleBlendMode;
use ember_core::{Angle, Color, EmberError, Result, Vec2};
use std::path::Path;

/// Texture reference inside an emitter file; the host owns the pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Every tunable of a particle system, as read from an emitter file
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystemConfig {
    pub texture: Option<TextureConfig>,
    pub particle_size: Vec2,
    pub color: Color,
    pub emitter: Vec2,
    pub direction: Angle,
    pub dispersion: Angle,
    pub velocity: f32,
    pub respawn_rate: f32,
    pub respawn_area: Vec2,
    pub lifetime: f32,
    pub exponential_growth: Vec2,
    pub emitted: bool,
    pub attenuated: bool,
    pub blend_mode: ParticleBlendMode,
    /// Particles fired by the host right after loading; 0 disables
    pub burst_count: u32,
    pub burst_radius: f32,
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self {
            texture: None,
            particle_size: Vec2::splat(32.0),
            color: Color::WHITE,
            emitter: Vec2::ZERO,
            direction: Angle::ZERO,
            dispersion: Angle::ZERO,
            velocity: 0.0,
            respawn_rate: 0.0,
            respawn_area: Vec2::ZERO,
            lifetime: 0.0,
            exponential_growth: Vec2::ONE,
            emitted: false,
            attenuated: false,
            blend_mode: ParticleBlendMode::Alpha,
            burst_count: 0,
            burst_radius: 0.0,
        }
    }
}

impl ParticleSystemConfig {
    /// Parse from an emitter TOML table.
    ///
    /// Missing or wrongly typed keys keep their defaults. Values that parse
    /// but cannot describe a valid emitter are rejected.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = table.get("texture") {
            let texture = parse_texture(v)?;
            // particles take the texture's native size unless sized explicitly
            config.particle_size = Vec2::new(texture.width as f32, texture.height as f32);
            config.texture = Some(texture);
        }
        if let Some(v) = table.get("particle_size") {
            config.particle_size = toml_vec2(v, config.particle_size);
        }
        if let Some(v) = table.get("color") {
            config.color = parse_color(v)?;
        }
        if let Some(v) = table.get("emitter") {
            config.emitter = toml_vec2(v, config.emitter);
        }
        if let Some(v) = table.get("direction") {
            config.direction = Angle::degrees(toml_f32(v, 0.0));
        }
        if let Some(v) = table.get("dispersion") {
            config.dispersion = Angle::degrees(toml_f32(v, 0.0));
        }
        if let Some(v) = table.get("velocity") {
            config.velocity = toml_f32(v, config.velocity);
        }
        if let Some(v) = table.get("respawn_rate") {
            config.respawn_rate = toml_f32(v, config.respawn_rate);
        }
        if let Some(v) = table.get("respawn_area") {
            config.respawn_area = toml_vec2(v, config.respawn_area);
        }
        if let Some(v) = table.get("lifetime") {
            config.lifetime = toml_f32(v, config.lifetime);
        }
        if let Some(v) = table.get("exponential_growth") {
            config.exponential_growth = toml_vec2(v, config.exponential_growth);
        }
        if let Some(v) = table.get("emitted") {
            config.emitted = v.as_bool().unwrap_or(false);
        }
        if let Some(v) = table.get("attenuated") {
            config.attenuated = v.as_bool().unwrap_or(false);
        }
        if let Some(v) = table.get("blend_mode") {
            config.blend_mode = match v.as_str().unwrap_or("alpha") {
                "additive" => ParticleBlendMode::Additive,
                _ => ParticleBlendMode::Alpha,
            };
        }
        if let Some(v) = table.get("burst_count") {
            config.burst_count = parse_burst_count(v)?;
        }
        if let Some(v) = table.get("burst_radius") {
            config.burst_radius = toml_f32(v, 0.0);
        }

        Ok(config)
    }

    /// Parse a whole emitter document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        Self::from_toml(&table)
    }

    /// Read an emitter file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Write back in the same shape `from_toml` reads
    pub fn to_toml(&self) -> toml::value::Table {
        let mut table = toml::value::Table::new();

        if let Some(texture) = &self.texture {
            let mut t = toml::value::Table::new();
            t.insert("name".into(), toml::Value::String(texture.name.clone()));
            t.insert("width".into(), toml::Value::Integer(texture.width as i64));
            t.insert("height".into(), toml::Value::Integer(texture.height as i64));
            table.insert("texture".into(), toml::Value::Table(t));
        }
        table.insert("particle_size".into(), vec2_value(self.particle_size));
        table.insert(
            "color".into(),
            toml::Value::Array(
                self.color
                    .to_array()
                    .iter()
                    .map(|c| toml::Value::Integer(*c as i64))
                    .collect(),
            ),
        );
        table.insert("emitter".into(), vec2_value(self.emitter));
        table.insert("direction".into(), float_value(self.direction.as_degrees()));
        table.insert("dispersion".into(), float_value(self.dispersion.as_degrees()));
        table.insert("velocity".into(), float_value(self.velocity));
        table.insert("respawn_rate".into(), float_value(self.respawn_rate));
        table.insert("respawn_area".into(), vec2_value(self.respawn_area));
        table.insert("lifetime".into(), float_value(self.lifetime));
        table.insert("exponential_growth".into(), vec2_value(self.exponential_growth));
        table.insert("emitted".into(), toml::Value::Boolean(self.emitted));
        table.insert("attenuated".into(), toml::Value::Boolean(self.attenuated));
        let blend = match self.blend_mode {
            ParticleBlendMode::Alpha => "alpha",
            ParticleBlendMode::Additive => "additive",
        };
        table.insert("blend_mode".into(), toml::Value::String(blend.into()));
        table.insert(
            "burst_count".into(),
            toml::Value::Integer(self.burst_count as i64),
        );
        table.insert("burst_radius".into(), float_value(self.burst_radius));

        table
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.to_toml())?)
    }
}

fn parse_texture(v: &toml::Value) -> Result<TextureConfig> {
    let invalid = |reason: &str| EmberError::InvalidConfig {
        field: "texture".into(),
        reason: reason.into(),
    };

    let table = v.as_table().ok_or_else(|| invalid("expected a table"))?;
    let name = table
        .get("name")
        .and_then(|n| n.as_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| invalid("missing name"))?;
    let dim = |key: &str| {
        table
            .get(key)
            .and_then(|d| d.as_integer())
            .filter(|d| *d > 0 && *d <= u32::MAX as i64)
            .map(|d| d as u32)
            .ok_or_else(|| invalid(&format!("{key} must be a positive integer")))
    };

    Ok(TextureConfig {
        name: name.to_string(),
        width: dim("width")?,
        height: dim("height")?,
    })
}

fn parse_burst_count(v: &toml::Value) -> Result<u32> {
    match v.as_integer() {
        Some(n) => u32::try_from(n.max(0)).map_err(|_| EmberError::InvalidConfig {
            field: "burst_count".into(),
            reason: format!("{n} is more particles than a burst can hold"),
        }),
        None => Ok(0),
    }
}

fn parse_color(v: &toml::Value) -> Result<Color> {
    let invalid = |reason: String| EmberError::InvalidConfig {
        field: "color".into(),
        reason,
    };

    let arr = v
        .as_array()
        .ok_or_else(|| invalid("expected [r, g, b] or [r, g, b, a]".into()))?;
    if arr.len() != 3 && arr.len() != 4 {
        return Err(invalid(format!("expected 3 or 4 components, got {}", arr.len())));
    }

    let mut channels = [255u8; 4];
    for (slot, value) in channels.iter_mut().zip(arr) {
        let c = value
            .as_integer()
            .ok_or_else(|| invalid("components must be integers".into()))?;
        *slot = u8::try_from(c)
            .map_err(|_| invalid(format!("component {c} is outside 0..=255")))?;
    }
    let [r, g, b, a] = channels;
    Ok(Color::new(r, g, b, a))
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_vec2(v: &toml::Value, default: Vec2) -> Vec2 {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 2 {
            return Vec2::new(toml_f32(&arr[0], default.x), toml_f32(&arr[1], default.y));
        }
    }
    default
}

fn float_value(v: f32) -> toml::Value {
    toml::Value::Float(v as f64)
}

fn vec2_value(v: Vec2) -> toml::Value {
    toml::Value::Array(vec![float_value(v.x), float_value(v.y)])
}
