use std::fmt;

/// Result of averaging a sample set.
///
/// An empty set is reported as the integer `0` rather than NaN; downstream
/// consumers of the report expect a number on stdout either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeanValue {
    Empty,
    Value(f64),
}

impl MeanValue {
    /// Numeric view of the mean. `Empty` collapses to `0.0`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Empty => 0.0,
            Self::Value(v) => *v,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for MeanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("0"),
            Self::Value(v) => f.write_str(&float_repr(*v)),
        }
    }
}

/// Shortest round-trip rendering of a float, always with a fractional part
/// or an exponent, and exponents written signed with at least two digits
/// (`10.0`, `1e+16`, `1e-05`).
fn float_repr(v: f64) -> String {
    // Debug already picks the shortest digits and switches to exponent form
    // outside [1e-4, 1e16); only the exponent spelling needs adjusting.
    let s = format!("{v:?}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

// ─── Accumulator ─────────────────────────────────────────────────

/// Running sum and count of integer samples.
///
/// The sum saturates at the `i128` bounds, which only saturated float
/// samples can reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mean {
    sum: i128,
    count: u64,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: i128) {
        self.sum = self.sum.saturating_add(value);
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> i128 {
        self.sum
    }

    pub fn value(&self) -> MeanValue {
        if self.count == 0 {
            return MeanValue::Empty;
        }
        // Both operands round to f64 before dividing, so sums beyond 2^53
        // can land one ulp away from the correctly rounded quotient.
        MeanValue::Value(self.sum as f64 / self.count as f64)
    }
}

impl Extend<i128> for Mean {
    fn extend<I: IntoIterator<Item = i128>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

/// Arithmetic mean of `values`; `MeanValue::Empty` when there are none.
pub fn mean<I: IntoIterator<Item = i128>>(values: I) -> MeanValue {
    let mut acc = Mean::new();
    acc.extend(values);
    acc.value()
}
