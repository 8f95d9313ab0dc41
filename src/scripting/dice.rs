//! Dice expressions
//!
//! `"NdF+M"` notation: `2d6`, `d20`, `3d4-1`, with optional spaces. Scripts
//! use it through the global `roll(expr)`.

use rand::Rng;

use crate::error::DiceError;

/// A parsed dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dice {
    pub count: u32,
    pub faces: u32,
    pub modifier: i32,
}

impl Dice {
    pub fn parse(expr: &str) -> Result<Self, DiceError> {
        let s: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        if s.is_empty() {
            return Err(DiceError::Empty);
        }

        let sep = s
            .find(['d', 'D'])
            .ok_or_else(|| DiceError::MissingSeparator(expr.to_string()))?;

        let count = if sep == 0 {
            1
        } else {
            s[..sep]
                .parse()
                .map_err(|_| DiceError::MissingSeparator(expr.to_string()))?
        };

        let rest = &s[sep + 1..];
        let faces_end = rest.find(['+', '-']).unwrap_or(rest.len());
        let faces: u32 = rest[..faces_end]
            .parse()
            .map_err(|_| DiceError::BadFaces(expr.to_string()))?;
        if faces == 0 {
            return Err(DiceError::BadFaces(expr.to_string()));
        }

        let modifier = if faces_end < rest.len() {
            let (sign, digits) = rest[faces_end..].split_at(1);
            let value: i32 = digits
                .parse()
                .map_err(|_| DiceError::BadModifier(expr.to_string()))?;
            if sign == "-" {
                -value
            } else {
                value
            }
        } else {
            0
        };

        Ok(Self { count, faces, modifier })
    }

    pub fn roll(&self, rng: &mut impl Rng) -> i32 {
        let total: i32 = (0..self.count)
            .map(|_| rng.gen_range(1..=self.faces) as i32)
            .sum();
        total + self.modifier
    }

    pub fn min(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    pub fn max(&self) -> i32 {
        (self.count * self.faces) as i32 + self.modifier
    }
}

/// Parse and roll in one go
pub fn roll(expr: &str, rng: &mut impl Rng) -> Result<i32, DiceError> {
    Ok(Dice::parse(expr)?.roll(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Dice::parse("2d6").unwrap(), Dice { count: 2, faces: 6, modifier: 0 });
        assert_eq!(Dice::parse("d20").unwrap(), Dice { count: 1, faces: 20, modifier: 0 });
        assert_eq!(Dice::parse(" 3 d 4 - 1 ").unwrap(), Dice { count: 3, faces: 4, modifier: -1 });
        assert_eq!(Dice::parse("1D8+2").unwrap(), Dice { count: 1, faces: 8, modifier: 2 });
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Dice::parse(""), Err(DiceError::Empty));
        assert!(matches!(Dice::parse("26"), Err(DiceError::MissingSeparator(_))));
        assert!(matches!(Dice::parse("2d0"), Err(DiceError::BadFaces(_))));
        assert!(matches!(Dice::parse("2d6+"), Err(DiceError::BadModifier(_))));
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let dice = Dice::parse("3d6+1").unwrap();
        for _ in 0..200 {
            let r = dice.roll(&mut rng);
            assert!((dice.min()..=dice.max()).contains(&r));
        }
    }
}
