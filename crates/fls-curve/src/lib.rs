//! `fls-curve` — motion curves for the FLS swarm simulator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`formula`]  | `Formula` — compiled scalar expression over `t`                |
//! | [`parser`]   | Tokenizer and recursive-descent parser for formula text        |
//! | [`segment`]  | `CurveSegment` — nine formulas for one keyframe interval       |
//! | [`composer`] | `TransformComposer` — segment → 4×4 homogeneous transform      |
//! | [`timeline`] | `Timeline` — ordered, non-overlapping segment registry         |
//! | [`loader`]   | JSON curve-definition loader                                   |
//! | [`error`]    | `CurveError`, `FormulaParseError`, `EvaluationError`           |
//!
//! # Formula language
//!
//! Curve formulas are authored outside this program, so they are compiled
//! against a small fixed grammar rather than handed to a general evaluator:
//! numeric literals, the parameter `t`, `+ - * / ^ **`, the constants `pi`,
//! `e`, `tau`, and an allow-listed set of elementary functions.  Anything
//! else is a [`FormulaParseError`] at load time.

pub mod composer;
pub mod error;
pub mod formula;
pub mod loader;
pub mod parser;
pub mod segment;
pub mod timeline;


pub use composer::{TransformComposer, compose};
pub use error::{CurveError, CurveResult, EvaluationError, FormulaParseError};
pub use formula::Formula;
pub use loader::{load_timeline_json, load_timeline_reader};
pub use segment::{Attribute, Axis, AxisFormulas, CurveSample, CurveSegment};
pub use timeline::Timeline;
