use alloc::vec::Vec;

/// Occupancy statistics of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Number of stored entries.
    pub len: usize,
    /// Number of buckets.
    pub capacity: usize,
    /// Buckets holding at least one entry.
    pub occupied_buckets: usize,
    /// Entries per bucket (`len / capacity`). May exceed 1 for chaining.
    pub load_factor: f64,
    /// Fraction of buckets in use (`occupied_buckets / capacity`).
    pub bucket_utilization: f64,
    /// Longest chain (chaining) or longest run of consecutive occupied
    /// slots (probing).
    pub longest_run: usize,
}

impl TableStats {
    pub(crate) fn new(
        len: usize,
        capacity: usize,
        occupied_buckets: usize,
        longest_run: usize,
    ) -> Self {
        Self {
            len,
            capacity,
            occupied_buckets,
            load_factor: ratio(len, capacity),
            bucket_utilization: ratio(occupied_buckets, capacity),
            longest_run,
        }
    }

    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.len,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Bucket Usage: {}/{} ({:.2}% utilization)",
            self.occupied_buckets,
            self.capacity,
            self.bucket_utilization * 100.0
        );
        println!("Longest Run: {}", self.longest_run);
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Counts indexed by a small non-negative quantity such as chain length or
/// probe distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    label: &'static str,
    bins: Vec<usize>,
}

impl Histogram {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            bins: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, bin: usize) {
        if self.bins.len() <= bin {
            self.bins.resize(bin + 1, 0);
        }
        self.bins[bin] += 1;
    }

    /// What each bin index measures.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The counts; `bins()[i]` is the number of samples equal to `i`.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("{} histogram: empty", self.label);
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("{} histogram ({} samples):", self.label, self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        for (i, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", i, make_bar(count), count);
        }
    }
}
