//! Tests for the flsim driver.

#[cfg(test)]
mod output_status_tests {
    use std::path::Path;

    use fls_curve::load_timeline_reader;
    use fls_motion::load_offsets_reader;
    use fls_output::{OutputError, OutputResult, OutputWriter, SwarmOutputObserver, UnitTickRow};
    use fls_sim::{SimBuilder, SwarmReport};

    use crate::{SAMPLE_CURVES_JSON, SAMPLE_OFFSETS_JSON, output_status};

    /// Rejects the report; accepts everything else.
    struct NoReport;

    impl OutputWriter for NoReport {
        fn write_ticks(&mut self, _rows: &[UnitTickRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_report(&mut self, _report: &SwarmReport) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn run_sample<W: OutputWriter>(writer: W) -> SwarmOutputObserver<W> {
        let timeline = load_timeline_reader(SAMPLE_CURVES_JSON.as_bytes()).unwrap();
        let offsets = load_offsets_reader(SAMPLE_OFFSETS_JSON.as_bytes()).unwrap();
        let mut sim = SimBuilder::new(Default::default(), timeline, offsets).build().unwrap();
        let mut obs = SwarmOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        obs
    }

    #[test]
    fn failed_report_write_fails_the_run() {
        let mut obs = run_sample(NoReport);
        let err = output_status(&mut obs, Path::new("out")).unwrap_err();
        assert!(err.to_string().contains("writing outputs to out"));
        assert!(format!("{err:#}").contains("disk full"));
    }

    #[test]
    fn clean_run_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let writer = fls_output::CsvWriter::new(dir.path()).unwrap();
        let mut obs = run_sample(writer);
        assert!(output_status(&mut obs, dir.path()).is_ok());
        assert!(dir.path().join(fls_output::CsvWriter::REPORT_FILE).exists());
    }
}
