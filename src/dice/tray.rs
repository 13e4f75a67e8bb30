//! Free-form dice tray and the literal expression evaluator
//!
//! Accepts `NdS`, `dS` and `NdS±M` with any whitespace. Anything else
//! rolls `1d6`, so a malformed expression still produces a roll.

use crate::dice::notation::{number, DiceRoll};
use crate::dice::rng::RandomSource;
use nom::{
    character::complete::one_of,
    combinator::{all_consuming, opt},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A normalised `NdS±M` roll request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
    /// False when the input was not understood and `1d6` was substituted
    pub valid: bool,
}

impl Default for DiceExpression {
    fn default() -> Self {
        Self {
            count: 1,
            sides: 6,
            modifier: 0,
            valid: false,
        }
    }
}

type ExpressionParts = (Option<u32>, char, u32, Option<(char, u32)>);

fn expression(input: &str) -> IResult<&str, ExpressionParts> {
    all_consuming((opt(number), one_of("dD"), number, opt((one_of("+-"), number)))).parse(input)
}

impl DiceExpression {
    /// Parse an expression, substituting `1d6` on failure
    pub fn parse(expr: &str) -> Self {
        let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();

        match expression(&compact) {
            Ok((_, (count, _, sides, modifier))) => {
                let modifier = match modifier {
                    Some(('-', m)) => -(m.min(i32::MAX as u32) as i32),
                    Some((_, m)) => m.min(i32::MAX as u32) as i32,
                    None => 0,
                };
                Self {
                    count: count.unwrap_or(1).max(1),
                    sides: sides.max(2),
                    modifier,
                    valid: true,
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Roll every die; the total is clamped to `[0, u32::MAX]`
    pub fn roll(&self, dice: &mut dyn RandomSource) -> DiceRoll {
        let faces: Vec<u32> = (0..self.count).map(|_| dice.roll_die(self.sides)).collect();
        let sum: i64 = faces.iter().map(|&f| f as i64).sum();
        let total = (sum + self.modifier as i64).clamp(0, u32::MAX as i64) as u32;
        DiceRoll { faces, total }
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

/// One free-form roll as kept in tray history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrayRoll {
    /// What the user typed if valid, otherwise the substituted expression
    pub expr: String,
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
    pub rolls: Vec<u32>,
    pub total: u32,
}

/// Roll an expression once
pub fn roll_expression(expr: &str, dice: &mut dyn RandomSource) -> TrayRoll {
    let parsed = DiceExpression::parse(expr);
    let roll = parsed.roll(dice);
    TrayRoll {
        expr: if parsed.valid {
            expr.trim().to_string()
        } else {
            parsed.to_string()
        },
        count: parsed.count,
        sides: parsed.sides,
        modifier: parsed.modifier,
        rolls: roll.faces,
        total: roll.total,
    }
}

/// Local roll history, newest first
#[derive(Debug, Clone)]
pub struct DiceTray {
    history: VecDeque<TrayRoll>,
    limit: usize,
}

impl DiceTray {
    pub fn new(limit: usize) -> Self {
        Self {
            history: VecDeque::new(),
            limit,
        }
    }

    /// Roll and record; the oldest entry drops once the limit is reached
    pub fn roll(&mut self, expr: &str, dice: &mut dyn RandomSource) -> TrayRoll {
        let result = roll_expression(expr, dice);
        self.history.push_front(result.clone());
        self.history.truncate(self.limit);
        result
    }

    pub fn history(&self) -> impl Iterator<Item = &TrayRoll> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::rng::ScriptedDice;

    #[test]
    fn test_parse_with_whitespace_and_modifier() {
        let expr = DiceExpression::parse(" 2 d 6 - 1 ");
        assert_eq!((expr.count, expr.sides, expr.modifier), (2, 6, -1));
        assert!(expr.valid);
    }

    #[test]
    fn test_parse_without_count() {
        let expr = DiceExpression::parse("d20");
        assert_eq!((expr.count, expr.sides), (1, 20));
    }

    #[test]
    fn test_garbage_becomes_one_d6() {
        let expr = DiceExpression::parse("lots of dice");
        assert!(!expr.valid);
        assert_eq!(expr.to_string(), "1d6");
    }

    #[test]
    fn test_zero_count_and_tiny_die_are_raised() {
        let expr = DiceExpression::parse("0d1");
        assert_eq!((expr.count, expr.sides), (1, 2));
    }

    #[test]
    fn test_negative_total_floors_at_zero() {
        let mut dice = ScriptedDice::new(vec![1]);
        let roll = DiceExpression::parse("1d6-3").roll(&mut dice);
        assert_eq!(roll.total, 0);
    }

    #[test]
    fn test_invalid_expression_reports_substitute() {
        let mut dice = ScriptedDice::new(vec![5]);
        let roll = roll_expression("banana", &mut dice);
        assert_eq!(roll.expr, "1d6");
        assert_eq!(roll.total, 5);
    }

    #[test]
    fn test_tray_history_capped_newest_first() {
        let mut tray = DiceTray::new(2);
        let mut dice = ScriptedDice::new(vec![1, 2, 3]);
        tray.roll("d6", &mut dice);
        tray.roll("d6", &mut dice);
        tray.roll("d6", &mut dice);
        let totals: Vec<u32> = tray.history().map(|r| r.total).collect();
        assert_eq!(totals, vec![3, 2]);
    }
}
