//! Address grammar
//!
//! ```text
//! /effect/<effect>/segment/<segment>/<field>
//! /effect/<effect>/segment/create
//! /effect/<effect>/segment/delete
//! /effect/<effect>/settings
//! /effect/<effect>/clear
//! ```

use crate::effect::EffectId;
use crate::segment::SegmentId;

const FIELD_NAME_COLOR: &str = "color";
const FIELD_NAME_TRANSPARENCY: &str = "transparency";
const FIELD_NAME_LENGTH: &str = "length";
const FIELD_NAME_MOVE_SPEED: &str = "move_speed";
const FIELD_NAME_MOVE_RANGE: &str = "move_range";
const FIELD_NAME_INITIAL_POSITION: &str = "initial_position";
const FIELD_NAME_IS_EDGE_REFLECT: &str = "is_edge_reflect";
const FIELD_NAME_DIMMER_TIME: &str = "dimmer_time";
const FIELD_NAME_PRESET: &str = "preset";

/// Segment field selected by the address tail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentField {
    Color,
    Transparency,
    Length,
    MoveSpeed,
    MoveRange,
    InitialPosition,
    IsEdgeReflect,
    DimmerTime,
    Preset,
}

impl SegmentField {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Some(match s {
            FIELD_NAME_COLOR => Self::Color,
            FIELD_NAME_TRANSPARENCY => Self::Transparency,
            FIELD_NAME_LENGTH => Self::Length,
            FIELD_NAME_MOVE_SPEED => Self::MoveSpeed,
            FIELD_NAME_MOVE_RANGE => Self::MoveRange,
            FIELD_NAME_INITIAL_POSITION => Self::InitialPosition,
            FIELD_NAME_IS_EDGE_REFLECT => Self::IsEdgeReflect,
            FIELD_NAME_DIMMER_TIME => Self::DimmerTime,
            FIELD_NAME_PRESET => Self::Preset,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => FIELD_NAME_COLOR,
            Self::Transparency => FIELD_NAME_TRANSPARENCY,
            Self::Length => FIELD_NAME_LENGTH,
            Self::MoveSpeed => FIELD_NAME_MOVE_SPEED,
            Self::MoveRange => FIELD_NAME_MOVE_RANGE,
            Self::InitialPosition => FIELD_NAME_INITIAL_POSITION,
            Self::IsEdgeReflect => FIELD_NAME_IS_EDGE_REFLECT,
            Self::DimmerTime => FIELD_NAME_DIMMER_TIME,
            Self::Preset => FIELD_NAME_PRESET,
        }
    }
}

/// What an address targets inside its effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Segment {
        id: SegmentId,
        field: SegmentField,
    },
    CreateSegment,
    DeleteSegment,
    Settings,
    Clear,
}

/// A parsed address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub effect: EffectId,
    pub target: Target,
}

impl Route {
    /// Parse an address. Anything outside the grammar yields `None`.
    pub fn parse(address: &str) -> Option<Self> {
        let mut parts = address.strip_prefix('/')?.split('/');

        if parts.next()? != "effect" {
            return None;
        }
        let effect = parse_id(parts.next()?)?;

        let target = match parts.next()? {
            "settings" => Target::Settings,
            "clear" => Target::Clear,
            "segment" => match parts.next()? {
                "create" => Target::CreateSegment,
                "delete" => Target::DeleteSegment,
                id => Target::Segment {
                    id: parse_id(id)?,
                    field: SegmentField::parse_from_str(parts.next()?)?,
                },
            },
            _ => return None,
        };

        // Trailing components are not part of any pattern
        if parts.next().is_some() {
            return None;
        }

        Some(Self { effect, target })
    }
}

/// Parse a decimal id with an optional sign
fn parse_id(s: &str) -> Option<i32> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
