pub type EngineResult<T, E = EngineReport> = core::result::Result<T, E>;

pub struct EngineReport {
    inner: eyre::Report,
}
impl From<eyre::Report> for EngineReport {
    fn from(report: eyre::Report) -> Self {
        Self { inner: report }
    }
}
impl std::fmt::Display for EngineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::fmt::Debug for EngineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

impl From<windows::core::Error> for EngineReport {
    fn from(error: windows::core::Error) -> Self {
        Self {
            inner: eyre::Report::new(WrappedWindowsError::from(error)),
        }
    }
}

/// `windows::core::Error` formats its HRESULT and message differently in `Debug`,
/// this keeps report chains readable.
pub struct WrappedWindowsError {
    inner: windows::core::Error,
}
impl From<windows::core::Error> for WrappedWindowsError {
    fn from(error: windows::core::Error) -> Self {
        Self { inner: error }
    }
}

impl std::error::Error for WrappedWindowsError {}
impl std::fmt::Display for WrappedWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::fmt::Debug for WrappedWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    fn parse_sample_count(text: &str) -> EngineResult<u32> {
        let count = text
            .parse::<u32>()
            .wrap_err_with(|| format!("invalid sample count {text:?}"))?;
        Ok(count)
    }

    #[test]
    fn eyre_reports_convert_with_context() {
        let report = parse_sample_count("four").unwrap_err();
        assert_eq!(report.to_string(), "invalid sample count \"four\"");
        assert!(format!("{report:?}").contains("invalid digit"));
    }

    #[test]
    fn success_passes_through() {
        assert_eq!(parse_sample_count("4").unwrap(), 4);
    }
}
