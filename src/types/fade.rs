//! Brightness ramps.

use crate::errors::Error;

/// Options for [`Controller::fade`](crate::Controller::fade).
///
/// Fading in ramps brightness from 0 up to `amount` in `step` increments;
/// fading out ramps from `amount` back down to 0.
///
/// ```
/// use govee_ble_rs::Fade;
///
/// let fade = Fade::new().amount(10).step(5);
/// assert_eq!(fade.levels().unwrap(), vec![0, 5, 10, 10, 5, 0]);
/// assert!(Fade::new().step(0).levels().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fade {
    pub(crate) fade_in: bool,
    pub(crate) fade_out: bool,
    pub(crate) amount: i32,
    pub(crate) step: i32,
    pub(crate) color: Option<String>,
}

impl Default for Fade {
    fn default() -> Self {
        Fade {
            fade_in: true,
            fade_out: true,
            amount: 100,
            step: 1,
            color: None,
        }
    }
}

impl Fade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fade_in(mut self, enabled: bool) -> Self {
        self.fade_in = enabled;
        self
    }

    pub fn fade_out(mut self, enabled: bool) -> Self {
        self.fade_out = enabled;
        self
    }

    /// Peak brightness in percent (0-100).
    pub fn amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    /// Brightness change per frame in percent (at least 1).
    pub fn step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    /// Color to switch to, at zero brightness, before the ramp starts.
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// The brightness of every frame the fade sends, in order.
    pub fn levels(&self) -> Result<Vec<i32>, Error> {
        if !(0..=100).contains(&self.amount) {
            return Err(Error::out_of_range("fade amount", self.amount.into(), 0, 100));
        }
        if self.step < 1 {
            return Err(Error::out_of_range("fade step", self.step.into(), 1, i32::MAX.into()));
        }

        let step = self.step as usize;
        let mut levels = Vec::new();
        if self.fade_in {
            levels.extend((0..=self.amount).step_by(step));
        }
        if self.fade_out {
            levels.extend((0..=self.amount).rev().step_by(step));
        }
        Ok(levels)
    }
}
