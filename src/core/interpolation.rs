/// Tolerance for matching stored floating point keys such as mortality percentages.
pub const KEY_TOLERANCE: f64 = 1e-6;

pub fn approximately_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Linear interpolation of `x` between `(x_low, y_low)` and `(x_high, y_high)`.
///
/// Returns the bound values untouched when `x` sits on a bound, so callers can rely on
/// exact equality there. A degenerate interval yields `y_low`.
pub fn interpolate_linear(x: f64, x_low: f64, x_high: f64, y_low: f64, y_high: f64) -> f64 {
    if approximately_equal(x, x_low, KEY_TOLERANCE) || approximately_equal(x_low, x_high, KEY_TOLERANCE) {
        return y_low;
    }
    if approximately_equal(x, x_high, KEY_TOLERANCE) {
        return y_high;
    }

    let slope = (y_low - y_high) / (x_high - x_low);
    y_low - (x - x_low) * slope
}

/// Which side of a year cut a query falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearRegime {
    Past,
    Future,
}

/// 兩組互斥的資料列，以切分年份區隔
///
/// The cut year itself belongs to the future regime.
#[derive(Debug, Clone)]
pub struct YearPartitionedTable<T> {
    cut_year: i32,
    past: Vec<T>,
    future: Vec<T>,
}

impl<T> YearPartitionedTable<T> {
    pub fn new(cut_year: i32, past: Vec<T>, future: Vec<T>) -> Self {
        Self {
            cut_year,
            past,
            future,
        }
    }

    pub fn cut_year(&self) -> i32 {
        self.cut_year
    }

    pub fn regime(&self, year: i32) -> YearRegime {
        if year >= self.cut_year {
            YearRegime::Future
        } else {
            YearRegime::Past
        }
    }

    pub fn partition(&self, year: i32) -> &[T] {
        match self.regime(year) {
            YearRegime::Past => &self.past,
            YearRegime::Future => &self.future,
        }
    }

    pub fn len(&self) -> usize {
        self.past.len() + self.future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }
}

/// Why a single-row lookup produced no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMiss {
    NotFound,
    Ambiguous(usize),
}

/// Finds the only row matching `predicate`.
pub fn find_single<'a, T, F>(rows: &'a [T], mut predicate: F) -> Result<&'a T, LookupMiss>
where
    F: FnMut(&T) -> bool,
{
    let mut matches = rows.iter().filter(|row| predicate(row));
    let first = matches.next().ok_or(LookupMiss::NotFound)?;
    let extra = matches.count();
    if extra > 0 {
        return Err(LookupMiss::Ambiguous(extra + 1));
    }
    Ok(first)
}
