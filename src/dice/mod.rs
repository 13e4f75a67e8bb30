//! Dice notation, random sources, and the free-form tray

pub mod notation;
pub mod rng;
pub mod tray;

pub use notation::{parse_dice_notation, parse_notation, DiceDescriptor, DiceRoll, DiceStats, DiceValue};
pub use rng::{phrase_seed, RandomSource, ScriptedDice, SeededDice};
pub use tray::{roll_expression, DiceExpression, DiceTray, TrayRoll};
