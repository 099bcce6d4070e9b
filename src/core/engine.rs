use crate::config::Config;
use crate::core::abbreviations::{Abbreviation, AbbreviationTable};
use crate::core::corpus::{self, CorpusIndex};
use crate::core::pairs::{self, PairSummary};
use crate::core::validate::{ValidationReport, Validator};
use crate::error::Result;
use crate::extract::job::{run_job, JobReport, WriteOptions};
use crate::fuzzy::symspell::SymSpell;
use std::path::Path;

const SUGGESTION_EDIT_DISTANCE: usize = 2;

// The corpus engine is composed of the config, the merged abbreviation
// table and the siglum suggester built from it.
pub struct CorpusEngine {
    pub config: Config,
    pub abbreviations: AbbreviationTable,
    suggester: SymSpell,
}

impl CorpusEngine {
    pub fn new(config: Config) -> Result<Self> {
        let abbreviations = config.abbreviation_table()?;
        Ok(Self::with_table(config, abbreviations))
    }

    pub fn with_table(config: Config, abbreviations: AbbreviationTable) -> Self {
        let suggester = SymSpell::from_codes(abbreviations.codes(), SUGGESTION_EDIT_DISTANCE);
        Self {
            config,
            abbreviations,
            suggester,
        }
    }

    /// Loads `tika.toml` from `path` if it exists, otherwise starts from
    /// defaults rooted next to it.
    pub fn from_config_or_default(path: &Path) -> Result<Self> {
        Self::new(Config::load_or_default(path)?)
    }

    pub fn scan(&self, dir: &Path) -> Result<CorpusIndex> {
        corpus::scan(dir, &self.config.naming, &self.config.scan)
    }

    pub fn pairs(&self, index: &CorpusIndex) -> PairSummary {
        pairs::count_pairs(index)
    }

    pub fn validate(&self, index: &CorpusIndex) -> ValidationReport {
        Validator {
            naming: &self.config.naming,
            table: &self.abbreviations,
            suggester: &self.suggester,
            check_contents: true,
        }
        .validate(index)
    }

    pub fn lookup(&self, code: &str) -> Option<&Abbreviation> {
        self.abbreviations.lookup(code)
    }

    pub fn suggest(&self, code: &str) -> Option<String> {
        self.suggester.suggest(code)
    }

    pub fn run_job(&self, name: &str, options: WriteOptions) -> Result<JobReport> {
        let job = self.config.job(name)?;
        run_job(job, &self.config.base_dir, &self.config.naming, options)
    }

    /// Runs every configured job in order, stopping at the first error.
    pub fn run_jobs(&self, options: WriteOptions) -> Result<Vec<JobReport>> {
        self.config
            .jobs
            .iter()
            .map(|job| run_job(job, &self.config.base_dir, &self.config.naming, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn suggests_from_readme_codes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "- bca: Bodhicaryāvatāra\n- mua: Muktāvalī\n").unwrap();
        let engine = CorpusEngine::from_config_or_default(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(engine.lookup("bca").unwrap().title, "Bodhicaryāvatāra");
        assert_eq!(engine.suggest("muaa").as_deref(), Some("mua"));
    }

    #[test]
    fn unknown_job_is_an_error() {
        let engine = CorpusEngine::with_table(Config::default(), AbbreviationTable::new());
        assert!(engine.run_job("nope", WriteOptions::default()).is_err());
        assert!(engine.run_jobs(WriteOptions::default()).unwrap().is_empty());
    }
}
