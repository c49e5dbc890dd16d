use crate::models::{Direction, DisplayCursor};
use chrono::{Datelike, NaiveDate};

impl DisplayCursor {
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 <= 11).then_some(Self { year, month0 })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn advance(&mut self) -> Self {
        if self.month0 >= 11 {
            self.month0 = 0;
            self.year += 1;
        } else {
            self.month0 += 1;
        }
        *self
    }

    pub fn retreat(&mut self) -> Self {
        if self.month0 == 0 {
            self.month0 = 11;
            self.year -= 1;
        } else {
            self.month0 -= 1;
        }
        *self
    }

    pub fn step(&mut self, direction: Direction) -> Self {
        match direction {
            Direction::Previous => self.retreat(),
            Direction::Next => self.advance(),
        }
    }

    /// The cursor `months` steps away; negative goes backward.
    pub fn shifted(self, months: i32) -> Self {
        let absolute = self.year as i64 * 12 + self.month0 as i64 + months as i64;
        Self {
            year: absolute.div_euclid(12) as i32,
            month0: absolute.rem_euclid(12) as u32,
        }
    }
}
