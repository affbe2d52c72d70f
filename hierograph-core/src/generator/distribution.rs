//! In-degree statistics driving preferential attachment.
//!
//! A [`DegreeDistribution`] is a snapshot of how many nodes hold each in-degree.
//! The [`AttachmentTable`] turns that snapshot into Price's attachment
//! probability `(k + 1) * p_k / (m + 1)` for every observed degree `k`.

/// Count and fraction of nodes at each in-degree `0..=max`.
///
/// # Examples
/// ```
/// use hierograph_core::DegreeDistribution;
///
/// let distribution = DegreeDistribution::from_in_degrees(&[0, 0, 2, 0]);
/// assert_eq!(distribution.max_degree(), Some(2));
/// assert_eq!(distribution.count(0), 3);
/// assert_eq!(distribution.count(1), 0);
/// assert!((distribution.fraction(0) - 0.75).abs() < f64::EPSILON);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegreeDistribution {
    counts: Vec<usize>,
    nodes: usize,
}

impl DegreeDistribution {
    /// Tallies the supplied in-degrees.
    #[must_use]
    pub fn from_in_degrees(in_degrees: &[usize]) -> Self {
        let max = in_degrees.iter().copied().max();
        let mut counts = vec![0; max.map_or(0, |degree| degree + 1)];
        for &degree in in_degrees {
            if let Some(slot) = counts.get_mut(degree) {
                *slot += 1;
            }
        }
        Self {
            counts,
            nodes: in_degrees.len(),
        }
    }

    /// Largest observed in-degree, or `None` for an empty snapshot.
    #[must_use]
    pub fn max_degree(&self) -> Option<usize> {
        self.counts.len().checked_sub(1)
    }

    /// Number of nodes with in-degree `degree`.
    #[must_use]
    pub fn count(&self, degree: usize) -> usize {
        self.counts.get(degree).copied().unwrap_or(0)
    }

    /// Fraction `p_k` of nodes with in-degree `degree`.
    #[must_use]
    pub fn fraction(&self, degree: usize) -> f64 {
        if self.nodes == 0 {
            return 0.0;
        }
        self.count(degree) as f64 / self.nodes as f64
    }

    /// `p_k` for every `k` in `0..=max_degree`.
    #[must_use]
    pub fn fractions(&self) -> Vec<f64> {
        (0..self.counts.len())
            .map(|degree| self.fraction(degree))
            .collect()
    }

    /// Number of nodes in the snapshot.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes
    }
}

/// Per-degree probability that a node of that in-degree gains an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentTable {
    probabilities: Vec<f64>,
}

impl AttachmentTable {
    /// Applies Price's weighting to `distribution` for mean out-degree
    /// `mean_out_degree`.
    ///
    /// # Examples
    /// ```
    /// use hierograph_core::{AttachmentTable, DegreeDistribution};
    ///
    /// let distribution = DegreeDistribution::from_in_degrees(&[0, 1]);
    /// let table = AttachmentTable::price(&distribution, 1);
    /// assert!((table.probability(0) - 0.25).abs() < f64::EPSILON);
    /// assert!((table.probability(1) - 0.5).abs() < f64::EPSILON);
    /// assert_eq!(table.probability(7), 0.0);
    /// ```
    #[must_use]
    pub fn price(distribution: &DegreeDistribution, mean_out_degree: usize) -> Self {
        let denominator = (mean_out_degree + 1) as f64;
        let probabilities = distribution
            .fractions()
            .into_iter()
            .enumerate()
            .map(|(degree, p_k)| (degree + 1) as f64 * p_k / denominator)
            .collect();
        Self { probabilities }
    }

    /// Attachment probability for a node of in-degree `degree`; degrees
    /// outside the snapshot never attach.
    #[must_use]
    pub fn probability(&self, degree: usize) -> f64 {
        self.probabilities.get(degree).copied().unwrap_or(0.0)
    }

    /// Probabilities indexed by in-degree.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}
