//! Card IR generator: converts raw trading-card records into a
//! versioned Intermediate Representation for a downstream
//! simulation/training engine.
//!
//! The pipeline is strictly forward: normalize → classify → extract →
//! assemble → tag → hint → compose. Each stage is a pure function over
//! immutable inputs; rules text the pattern tables don't recognize
//! degrades parse confidence instead of failing.

pub mod ability;
pub mod clause;
pub mod color;
pub mod cost;
pub mod effect;
pub mod generator;
pub mod hints;
pub mod ir;
pub mod mana;
pub mod normalize;
pub mod record;
pub mod tagger;
pub mod trigger;
pub mod types;
pub mod zone;

pub use ability::{AbilityType, ParsedAbility};
pub use clause::{Clause, ClauseRole};
pub use color::{Color, ColorSet};
pub use cost::CostComponent;
pub use effect::{Amount, Condition, EffectAction, EffectDescriptor, TargetClass};
pub use generator::{IrError, convert, convert_all, parse_abilities};
pub use hints::RewardHints;
pub use ir::{CardIr, CardMetadata, FormatLegality, GameplayMetadata, IR_VERSION};
pub use mana::{ManaCost, ManaSymbol};
pub use record::CardRecord;
pub use tagger::{StrategicTag, StrategicTags};
pub use trigger::{TriggerCondition, TriggerEvent};
pub use types::{CardType, Supertype, TypeLine};
pub use zone::Zone;
