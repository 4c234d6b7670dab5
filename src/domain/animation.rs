//! Animation definition descriptors (group, view, sampled joint animation).
//!
//! Only the definitions are modeled; nothing here plays an animation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    #[default]
    None,
    Repeat,
    Autoreverse,
    Cumulative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenMode {
    #[default]
    Hold,
    Linear,
}

macro_rules! display_as_debug_lowercase {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", format!("{:?}", self).to_lowercase())
            }
        })*
    };
}

display_as_debug_lowercase!(RepeatMode, FillMode, TweenMode);

/// Timing and binding shared by every animation definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub name: String,
    pub bind_target: String,
    pub blend_layer: i32,
    pub additive: bool,
    pub speed: f32,
    pub delay: f64,
    pub duration: f64,
    pub offset: f64,
    pub trim_duration: Option<f64>,
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
    pub repeat_mode: RepeatMode,
    pub fill_mode: FillMode,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            name: String::new(),
            bind_target: "transform".into(),
            blend_layer: 0,
            additive: false,
            speed: 1.0,
            delay: 0.0,
            duration: 0.0,
            offset: 0.0,
            trim_duration: None,
            trim_start: None,
            trim_end: None,
            repeat_mode: RepeatMode::None,
            fill_mode: FillMode::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationGroup {
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(default)]
    pub group: Vec<AnimationDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationView {
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(default)]
    pub source: Option<Box<AnimationDefinition>>,
}

/// Joint-transform animation sampled at a fixed frame interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledAnimation {
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(default)]
    pub joint_names: Vec<String>,
    #[serde(default)]
    pub is_rotation_animated: bool,
    #[serde(default)]
    pub is_scale_animated: bool,
    #[serde(default)]
    pub is_translation_animated: bool,
    #[serde(default)]
    pub tween_mode: TweenMode,
    #[serde(default)]
    pub frame_interval: f32,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub frame_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationDefinition {
    Group(AnimationGroup),
    View(AnimationView),
    Sampled(SampledAnimation),
    /// Definition kind the dumps do not know how to describe.
    Other { name: String },
}

impl AnimationDefinition {
    pub fn name(&self) -> &str {
        match self {
            AnimationDefinition::Group(g) => &g.timing.name,
            AnimationDefinition::View(v) => &v.timing.name,
            AnimationDefinition::Sampled(s) => &s.timing.name,
            AnimationDefinition::Other { name } => name,
        }
    }
}
