use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail, ensure};
use rand::Rng;

/// The fixed set of images the wall cycles through.
///
/// Built once at startup by scanning a directory, then immutable for the
/// process lifetime. Lookups wrap modulo the catalog size so callers can use
/// unbounded (even negative) indices.
pub struct Catalog {
    paths: Vec<PathBuf>,
}

impl Catalog {
    /// Scans `dir` for image files, sorted by file name.
    pub fn scan(dir: &Path) -> anyhow::Result<Self> {
        let mut paths = Vec::new();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?;

        for entry in entries {
            let entry = entry.context("failed to read directory entry")?;
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                    match ext.to_lowercase().as_str() {
                        "png" | "jpg" | "jpeg" | "bmp" | "gif" => paths.push(path),
                        _ => {}
                    }
                }
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if paths.is_empty() {
            bail!("no image files found in directory {}", dir.display());
        }
        Ok(Self { paths })
    }

    /// Builds a catalog from an explicit path list, in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> anyhow::Result<Self> {
        ensure!(!paths.is_empty(), "catalog cannot be empty");
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Resolves an unbounded index to a path. `rem_euclid` keeps the result
    /// in range for negative indices too (index -1 maps to the last image).
    pub fn get(&self, index: i64) -> &Path {
        let wrapped = index.rem_euclid(self.paths.len() as i64) as usize;
        &self.paths[wrapped]
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// One uniform index draw, used when recycling a card.
    pub fn random_index(&self, rng: &mut impl Rng) -> usize {
        rng.random_range(0..self.paths.len())
    }

    /// Samples `count` distinct indices via a shuffle prefix (partial
    /// Fisher-Yates), so the cost stays bounded even when `count` approaches
    /// the catalog size. Fails fast when distinctness cannot be satisfied.
    pub fn random_distinct(&self, count: usize, rng: &mut impl Rng) -> anyhow::Result<Vec<usize>> {
        if count > self.paths.len() {
            bail!(
                "cannot pick {} distinct images from a catalog of {}",
                count,
                self.paths.len()
            );
        }
        let mut indices: Vec<usize> = (0..self.paths.len()).collect();
        for i in 0..count {
            let j = rng.random_range(i..indices.len());
            indices.swap(i, j);
        }
        indices.truncate(count);
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog_of(n: usize) -> Catalog {
        Catalog {
            paths: (1..=n).map(|i| PathBuf::from(format!("card_{i}.png"))).collect(),
        }
    }

    #[test]
    fn get_wraps_positive_indices() {
        let catalog = catalog_of(74);
        assert_eq!(catalog.get(0), Path::new("card_1.png"));
        assert_eq!(catalog.get(74), Path::new("card_1.png"));
        assert_eq!(catalog.get(77), Path::new("card_4.png"));
    }

    #[test]
    fn get_wraps_negative_indices() {
        let catalog = catalog_of(74);
        // index -1 must resolve to the last image, i.e. position 73
        assert_eq!(catalog.get(-1), Path::new("card_74.png"));
        assert_eq!(catalog.get(-75), Path::new("card_74.png"));
    }

    #[test]
    fn random_distinct_returns_unique_indices_in_range() {
        let catalog = catalog_of(10);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picks = catalog.random_distinct(5, &mut rng).unwrap();
            assert_eq!(picks.len(), 5);
            let mut sorted = picks.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 5, "duplicate index in {picks:?}");
            assert!(picks.iter().all(|&i| i < 10));
        }
    }

    #[test]
    fn random_distinct_can_exhaust_the_catalog() {
        let catalog = catalog_of(5);
        let mut rng = StdRng::seed_from_u64(1);
        let picks = catalog.random_distinct(5, &mut rng).unwrap();
        let mut sorted = picks;
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn from_paths_rejects_an_empty_list() {
        assert!(Catalog::from_paths(Vec::new()).is_err());
    }

    #[test]
    fn random_distinct_rejects_oversized_requests() {
        let catalog = catalog_of(3);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(catalog.random_distinct(4, &mut rng).is_err());
    }
}
