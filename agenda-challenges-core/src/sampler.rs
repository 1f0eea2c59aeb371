//! Constrained random page sampling.
//!
//! Every page holds a fixed number of distinct lines drawn uniformly from the
//! whole pool by rejection sampling. Categories may cap how many of their
//! lines land on one page (`max_per_page`) and may demand a minimum
//! (`min_per_page`); the minimums are drawn first and the finished page is
//! shuffled so the mandatory lines do not always lead.
//!
//! Constraints are checked once in [`PageSampler::new`]: if they cannot be
//! met the sampler is never built. The rejection loop is bounded by an
//! attempt budget; once it is spent the remaining lines are drawn directly
//! from the still-eligible ones, which yields the same distribution and always
//! completes for a pool that passed the check.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use tracing::{debug, error, info};

use crate::error::SamplingError;
use crate::pool::{Line, Pool};

/// Rejection draws per requested line before switching to direct draws
/// from the eligible lines.
pub const DEFAULT_ATTEMPTS_PER_LINE: usize = 1000;

/// Category every page must draw from unless the rules say otherwise.
pub const DEFAULT_MANDATORY_CATEGORY: &str = "tachadas";

/// Per-run sampling parameters.
#[derive(Debug, Clone)]
pub struct SamplingRules {
    pub per_page: usize,
    /// Categories that must contribute at least one line to every page, on
    /// top of any `min_per_page` declared in the pool itself.
    pub mandatory: Vec<String>,
    pub max_attempts: Option<usize>,
}

impl Default for SamplingRules {
    fn default() -> Self {
        Self {
            per_page: 10,
            mandatory: vec![DEFAULT_MANDATORY_CATEGORY.to_string()],
            max_attempts: None,
        }
    }
}

impl SamplingRules {
    /// Rules for pages of `per_page` lines with [`DEFAULT_MANDATORY_CATEGORY`]
    /// required on each.
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    pub fn with_mandatory<S: Into<String>>(mut self, category: S) -> Self {
        let category = category.into();
        if !self.mandatory.contains(&category) {
            self.mandatory.push(category);
        }
        self
    }

    /// Drops every mandatory name, including the default one. Minimums set
    /// in the pool still apply.
    pub fn without_mandatory(mut self) -> Self {
        self.mandatory.clear();
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

/// One page worth of lines, in final display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    lines: Vec<Line>,
}

impl Page {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn count_in(&self, category: &str) -> usize {
        self.lines.iter().filter(|l| l.category == category).count()
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }
}

#[derive(Debug)]
pub struct PageSampler<'a> {
    pool: &'a Pool,
    per_page: usize,
    minimums: Vec<usize>,
    caps: Vec<usize>,
    max_attempts: usize,
}

impl<'a> PageSampler<'a> {
    /// Validates `rules` against `pool`. Fails if a mandatory category is
    /// missing or too small, or if a full page cannot be reached under the
    /// caps.
    pub fn new(pool: &'a Pool, rules: &SamplingRules) -> Result<Self, SamplingError> {
        let categories = pool.categories();
        let mut minimums: Vec<usize> = categories.iter().map(|c| c.min_per_page).collect();
        let caps: Vec<usize> = categories.iter().map(|c| c.cap()).collect();

        for name in &rules.mandatory {
            let idx = pool.category_index(name).ok_or_else(|| {
                error!(category = %name, "Mandatory category is not in the pool");
                SamplingError::MandatoryCategoryUnavailable {
                    category: name.clone(),
                    available: 0,
                    required: 1,
                }
            })?;
            minimums[idx] = minimums[idx].max(1);
        }

        for (idx, &min) in minimums.iter().enumerate() {
            if min == 0 {
                continue;
            }
            let category = &categories[idx];
            let available = pool.range_of(idx).len();
            if available < min {
                error!(category = %category.name, available, required = min, "Mandatory category cannot be satisfied");
                return Err(SamplingError::MandatoryCategoryUnavailable {
                    category: category.name.clone(),
                    available,
                    required: min,
                });
            }
            if min > caps[idx] {
                return Err(unsatisfiable(
                    rules.per_page,
                    format!(
                        "category `{}` requires {} line(s) but is capped at {}",
                        category.name, min, caps[idx]
                    ),
                ));
            }
        }

        if rules.per_page == 0 {
            return Err(unsatisfiable(0, "page size must be positive".into()));
        }

        let required: usize = minimums.iter().sum();
        if required > rules.per_page {
            return Err(unsatisfiable(
                rules.per_page,
                format!("mandatory categories alone require {required} line(s)"),
            ));
        }

        let reachable: usize = (0..categories.len())
            .map(|idx| pool.range_of(idx).len().min(caps[idx]))
            .fold(0usize, |acc, n| acc.saturating_add(n));
        if reachable < rules.per_page {
            return Err(unsatisfiable(
                rules.per_page,
                format!("only {reachable} line(s) reachable under per-category caps"),
            ));
        }

        let max_attempts = rules
            .max_attempts
            .unwrap_or_else(|| rules.per_page.saturating_mul(DEFAULT_ATTEMPTS_PER_LINE));

        debug!(per_page = rules.per_page, reachable, required, max_attempts, "Page sampler ready");

        Ok(Self {
            pool,
            per_page: rules.per_page,
            minimums,
            caps,
            max_attempts,
        })
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn sample_page<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Page, SamplingError> {
        let pool = self.pool;
        let mut chosen: Vec<usize> = Vec::with_capacity(self.per_page);
        let mut taken = vec![false; pool.len()];
        let mut counts = vec![0usize; self.caps.len()];

        for (category_idx, &min) in self.minimums.iter().enumerate() {
            if min == 0 {
                continue;
            }
            let range = pool.range_of(category_idx);
            for offset in index::sample(rng, range.len(), min).into_iter() {
                let line_idx = range.start + offset;
                taken[line_idx] = true;
                chosen.push(line_idx);
            }
            counts[category_idx] += min;
        }

        let mut attempts = 0usize;
        while chosen.len() < self.per_page && attempts < self.max_attempts {
            attempts += 1;

            let line_idx = rng.gen_range(0..pool.len());
            if taken[line_idx] {
                continue;
            }
            let category_idx = pool.category_of(line_idx);
            if counts[category_idx] >= self.caps[category_idx] {
                debug!(
                    category = %pool.categories()[category_idx].name,
                    "Too many lines from category on this page already"
                );
                continue;
            }
            taken[line_idx] = true;
            counts[category_idx] += 1;
            chosen.push(line_idx);
        }

        if chosen.len() < self.per_page {
            debug!(
                attempts,
                filled = chosen.len(),
                per_page = self.per_page,
                "Rejection budget spent, drawing from eligible lines"
            );
        }
        while chosen.len() < self.per_page {
            let eligible: Vec<usize> = (0..pool.len())
                .filter(|&idx| !taken[idx])
                .filter(|&idx| {
                    let category_idx = pool.category_of(idx);
                    counts[category_idx] < self.caps[category_idx]
                })
                .collect();
            // Non-empty whenever the check in `new` passed.
            let Some(&line_idx) = eligible.choose(rng) else {
                error!(filled = chosen.len(), per_page = self.per_page, "No eligible line left for page");
                return Err(unsatisfiable(
                    self.per_page,
                    format!("no eligible line left with {} line(s) placed", chosen.len()),
                ));
            };
            taken[line_idx] = true;
            counts[pool.category_of(line_idx)] += 1;
            chosen.push(line_idx);
        }

        chosen.shuffle(rng);

        Ok(Page {
            lines: chosen
                .into_iter()
                .map(|idx| pool.lines()[idx].clone())
                .collect(),
        })
    }

    /// Draws `count` independent pages. Returns nothing if any page fails.
    pub fn sample_pages<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Page>, SamplingError> {
        (0..count)
            .map(|n| {
                info!(page = n + 1, "Generating data for page");
                self.sample_page(rng)
            })
            .collect()
    }
}

fn unsatisfiable(requested: usize, reason: String) -> SamplingError {
    error!(requested, reason = %reason, "Sampling constraints cannot be met");
    SamplingError::UnsatisfiableSamplingConstraints { requested, reason }
}
