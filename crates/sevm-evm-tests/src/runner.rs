//! Test runner and statistics

use crate::error::{TestError, TestResult};
use crate::fixture::{FixtureResults, FixtureRunner};
use sevm_evm::InterpreterConfig;
use std::path::Path;
use std::time::{Duration, Instant};

/// Aggregated test statistics
#[derive(Debug, Default)]
pub struct TestStats {
    /// Total cases seen
    pub total: usize,
    /// Cases passed
    pub passed: usize,
    /// Cases failed
    pub failed: usize,
    /// Cases skipped
    pub skipped: usize,
    /// Total execution time
    pub duration: Duration,
    /// Failed case names with reasons
    pub failures: Vec<(String, String)>,
}

impl TestStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file's results
    pub fn add_results(&mut self, results: &FixtureResults) {
        self.total += results.total();
        self.passed += results.passed.len();
        self.failed += results.failed.len();
        self.skipped += results.skipped.len();
        for (name, reason) in &results.failed {
            self.failures.push((name.clone(), reason.clone()));
        }
    }

    /// Record a file that could not be loaded
    pub fn add_broken_file(&mut self, file: &Path, reason: String) {
        self.total += 1;
        self.failed += 1;
        self.failures.push((file.display().to_string(), reason));
    }

    /// Whether every executed case passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            return 100.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }

    /// Print summary
    pub fn print_summary(&self) {
        println!("\n========================================");
        println!("Fixture Summary");
        println!("========================================");
        println!("Total:   {}", self.total);
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Skipped: {}", self.skipped);
        println!("Pass Rate: {:.2}%", self.pass_rate());
        println!("Duration: {:.2}s", self.duration.as_secs_f64());

        if !self.failures.is_empty() {
            println!("\nFailed cases:");
            for (name, reason) in &self.failures {
                println!("  - {}: {}", name, reason);
            }
        }
    }
}

/// Runs fixture files and directories
pub struct TestRunner {
    fixtures: FixtureRunner,
    /// Verbose output
    verbose: bool,
}

impl TestRunner {
    /// Create new test runner
    pub fn new(config: InterpreterConfig, verbose: bool) -> Self {
        Self {
            fixtures: FixtureRunner::new(config, verbose),
            verbose,
        }
    }

    /// Run a fixture file, or every `.json` file under a directory
    pub fn run_path(&self, path: &Path) -> TestResult<TestStats> {
        if !path.exists() {
            return Err(TestError::NotFound(path.to_path_buf()));
        }

        let mut stats = TestStats::new();
        let start = Instant::now();

        if path.is_dir() {
            if self.verbose {
                tracing::info!("Running fixtures from: {:?}", path);
            }
            self.run_dir_recursive(path, &mut stats)?;
        } else {
            self.run_file(path, &mut stats);
        }

        stats.duration = start.elapsed();
        Ok(stats)
    }

    fn run_dir_recursive(&self, dir: &Path, stats: &mut TestStats) -> TestResult<()> {
        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.run_dir_recursive(&path, stats)?;
            } else if path.extension().is_some_and(|e| e == "json") {
                self.run_file(&path, stats);
            }
        }

        Ok(())
    }

    fn run_file(&self, path: &Path, stats: &mut TestStats) {
        match self.fixtures.run_file(path) {
            Ok(results) => {
                if self.verbose || !results.failed.is_empty() {
                    tracing::info!(
                        "File: {:?} - {} passed, {} failed, {} skipped",
                        path,
                        results.passed.len(),
                        results.failed.len(),
                        results.skipped.len()
                    );
                }
                stats.add_results(&results);
            }
            Err(e) => {
                tracing::warn!("Failed to load {:?}: {}", path, e);
                stats.add_broken_file(path, e.to_string());
            }
        }
    }
}
