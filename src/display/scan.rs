//! Closed-form scan stepping
//!
//! Bresenham lines and midpoint circles expressed so any single step can be
//! computed directly. The rasterizer only visits the steps that can land on
//! its target, which keeps work bounded by the target size however far away
//! (or however large) a primitive is.

/// Bresenham line walk along the dominant axis.
///
/// Starts from the endpoint with the lower major coordinate. Shallow walks
/// (|dy| <= |dx|) advance the minor axis when the error term is >= 0, steep
/// walks only when it is > 0. A line and its reverse produce the same walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineWalk {
    x_major: bool,
    major0: i64,
    minor0: i64,
    minor_step: i64,
    d_major: i64,
    d_minor: i64,
}

impl LineWalk {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (x1, y1, x2, y2) = (i64::from(x1), i64::from(y1), i64::from(x2), i64::from(y2));
        let dx = x2 - x1;
        let dy = y2 - y1;
        // Minor axis moves forward when both deltas share a sign
        let minor_step = if (dx < 0 && dy < 0) || (dx > 0 && dy > 0) { 1 } else { -1 };

        if dy.abs() <= dx.abs() {
            let (x, y) = if dx >= 0 { (x1, y1) } else { (x2, y2) };
            Self {
                x_major: true,
                major0: x,
                minor0: y,
                minor_step,
                d_major: dx.abs(),
                d_minor: dy.abs(),
            }
        } else {
            let (x, y) = if dy >= 0 { (x1, y1) } else { (x2, y2) };
            Self {
                x_major: false,
                major0: y,
                minor0: x,
                minor_step,
                d_major: dy.abs(),
                d_minor: dx.abs(),
            }
        }
    }

    /// Number of steps; the walk has `steps() + 1` pixels
    #[inline]
    pub fn steps(&self) -> i64 {
        self.d_major
    }

    /// Minor-axis offset after `i` steps
    fn minor_offset(&self, i: i64) -> i64 {
        if self.d_major == 0 {
            return 0;
        }
        let tie = if self.x_major { 0 } else { 1 };
        let num = 2 * i128::from(self.d_minor) * i128::from(i) + i128::from(self.d_major) - tie;
        num.div_euclid(2 * i128::from(self.d_major)) as i64
    }

    /// Pixel after `i` steps
    pub fn point(&self, i: i64) -> (i64, i64) {
        let major = self.major0 + i;
        let minor = self.minor0 + self.minor_step * self.minor_offset(i);
        if self.x_major {
            (major, minor)
        } else {
            (minor, major)
        }
    }

    /// Steps whose major coordinate lies inside a `width` x `height` target.
    /// Empty when the walk misses it along the major axis.
    pub fn steps_within(&self, width: u32, height: u32) -> std::ops::RangeInclusive<i64> {
        let extent = i64::from(if self.x_major { width } else { height });
        let first = (-self.major0).max(0);
        let last = (extent - 1 - self.major0).min(self.steps());
        first..=last
    }

    /// Inclusive x-range of the walk's pixels on row `y`
    pub fn row_extent(&self, y: i64) -> Option<(i64, i64)> {
        if !self.x_major {
            let i = y - self.major0;
            if i < 0 || i > self.d_major {
                return None;
            }
            let (x, _) = self.point(i);
            return Some((x, x));
        }

        let m = (y - self.minor0) * self.minor_step;
        if m < 0 || m > self.d_minor {
            return None;
        }
        if self.d_minor == 0 {
            return Some((self.major0, self.major0 + self.d_major));
        }

        // First step whose minor offset reaches `m`
        let reach = |m: i64| {
            let num = 2 * i128::from(self.d_major) * i128::from(m) - i128::from(self.d_major);
            let den = 2 * i128::from(self.d_minor);
            (num + den - 1).div_euclid(den)
        };
        let lo = reach(m).max(0);
        let hi = (reach(m + 1) - 1).min(i128::from(self.d_major));
        if lo > hi {
            return None;
        }
        Some((self.major0 + lo as i64, self.major0 + hi as i64))
    }
}

/// Midpoint circle (decision term starting at `3 - 2r`) in closed form.
///
/// Covers the octant from the top of the circle clockwise to the diagonal:
/// column `x0` sits at row `y0 = row(x0)` for `0 <= x0 <= last_column()`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CircleWalk {
    radius: i64,
    last: i64,
}

impl CircleWalk {
    /// `radius` must be positive
    pub fn new(radius: i32) -> Self {
        let mut walk = Self {
            radius: i64::from(radius),
            last: 0,
        };
        // Last column still on or above the diagonal; row() never increases
        let (mut lo, mut hi) = (0, walk.radius);
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if walk.row(mid) >= mid {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        walk.last = lo;
        walk
    }

    #[inline]
    pub fn last_column(&self) -> i64 {
        self.last
    }

    /// Row of column `x0`: the largest y with y² + (y-1)² < 2(r² - x0²)
    pub fn row(&self, x0: i64) -> i64 {
        let r = i128::from(self.radius);
        let x = i128::from(x0);
        let t = 2 * (r * r - x * x);
        if t <= 1 {
            return 0;
        }
        let h = |y: i128| y * y + (y - 1) * (y - 1);
        let mut y = ((1.0 + ((2 * t - 1) as f64).sqrt()) / 2.0) as i128;
        while h(y + 1) < t {
            y += 1;
        }
        while y > 0 && h(y) >= t {
            y -= 1;
        }
        y as i64
    }

    /// Half-width of the filled disc at row offset `k` (0 <= k <= radius).
    ///
    /// The widest of the column stepped onto row `k` and the row stepped
    /// onto column `k`, as each step spans both.
    pub fn half_width(&self, k: i64) -> i64 {
        let (mut lo, mut hi) = (0, self.last);
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if self.row(mid) >= k {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        let mut w = if self.row(lo) == k { lo } else { -1 };
        if k <= self.last {
            w = w.max(self.row(k));
        }
        w
    }
}

/// Sorted, disjoint union of inclusive ranges clamped to [lo, hi]
pub(crate) fn merge_ranges(ranges: &[(i64, i64)], lo: i64, hi: i64) -> Vec<(i64, i64)> {
    let mut clamped: Vec<(i64, i64)> = ranges
        .iter()
        .map(|&(a, b)| (a.max(lo), b.min(hi)))
        .filter(|(a, b)| a <= b)
        .collect();
    clamped.sort_unstable();

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(clamped.len());
    for (a, b) in clamped {
        match merged.last_mut() {
            Some(last) if a <= last.1 + 1 => last.1 = last.1.max(b),
            _ => merged.push((a, b)),
        }
    }
    merged
}
