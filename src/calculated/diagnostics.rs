//! Recoverable problems found while translating an expression.
//!
//! None of these stop a conversion. Each one is logged through `tracing`
//! when its block is committed and kept on the translator so callers can
//! reject a document that produced errors.

use std::fmt;

/// Log target shared by every translator diagnostic.
pub(crate) const LOG_TARGET: &str = "quizconv::calculated";

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A literal is larger than the `fp` fixed-point range.
    NumericOverflow,
    /// A variable name is not a valid TeX macro name after sanitizing.
    VariableNaming,
    /// The function exists in the source dialect but not in the target one.
    UnsupportedFunctionKnown,
    /// The function is not known at all.
    UnsupportedFunctionUnknown,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::NumericOverflow | DiagnosticKind::VariableNaming => Severity::Warning,
            DiagnosticKind::UnsupportedFunctionKnown
            | DiagnosticKind::UnsupportedFunctionUnknown => Severity::Error,
        }
    }
}

/// A single warning or error reported during `render`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Forward the diagnostic to the installed `tracing` subscriber.
    pub(crate) fn emit(&self) {
        match self.severity() {
            Severity::Warning => {
                tracing::warn!(target: LOG_TARGET, kind = ?self.kind, "{}", self.message)
            },
            Severity::Error => {
                tracing::error!(target: LOG_TARGET, kind = ?self.kind, "{}", self.message)
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity() {
            Severity::Warning => write!(f, "Warning: {}", self.message),
            Severity::Error => write!(f, "Error: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_by_kind() {
        assert_eq!(DiagnosticKind::NumericOverflow.severity(), Severity::Warning);
        assert_eq!(DiagnosticKind::VariableNaming.severity(), Severity::Warning);
        assert_eq!(DiagnosticKind::UnsupportedFunctionKnown.severity(), Severity::Error);
        assert_eq!(DiagnosticKind::UnsupportedFunctionUnknown.severity(), Severity::Error);
    }

    #[test]
    fn test_display_prefixes_severity() {
        let warn = Diagnostic::new(DiagnosticKind::VariableNaming, "bad name");
        assert_eq!(warn.to_string(), "Warning: bad name");
        assert!(!warn.is_error());

        let err = Diagnostic::new(DiagnosticKind::UnsupportedFunctionUnknown, "no such call");
        assert_eq!(err.to_string(), "Error: no such call");
        assert!(err.is_error());
    }

    mod log_capture {
        use std::io;
        use std::sync::{Arc, Mutex};

        use tracing_subscriber::fmt::MakeWriter;

        use super::*;
        use crate::calculated::MoodleToFp;

        /// In-memory sink for formatted events.
        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Captured {
            fn contents(&self) -> String {
                String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
            }
        }

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Captured {
            type Writer = Captured;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        fn capture(f: impl FnOnce()) -> String {
            let sink = Captured::default();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(sink.clone())
                .with_ansi(false)
                .without_time()
                .with_target(true)
                .with_max_level(tracing::Level::TRACE)
                .finish();
            tracing::subscriber::with_default(subscriber, f);
            sink.contents()
        }

        #[test]
        fn test_emit_uses_level_and_target() {
            let logs = capture(|| {
                Diagnostic::new(DiagnosticKind::VariableNaming, "bad name").emit();
                Diagnostic::new(DiagnosticKind::UnsupportedFunctionKnown, "no such call").emit();
            });
            let lines: Vec<_> = logs.lines().collect();
            assert_eq!(lines.len(), 2, "{}", logs);

            assert!(lines[0].contains("WARN"));
            assert!(lines[0].contains(LOG_TARGET));
            assert!(lines[0].contains("bad name"));
            assert!(lines[0].contains("kind=VariableNaming"));

            assert!(lines[1].contains("ERROR"));
            assert!(lines[1].contains(LOG_TARGET));
            assert!(lines[1].contains("kind=UnsupportedFunctionKnown"));
        }

        #[test]
        fn test_render_logs_committed_diagnostics_only() {
            let logs = capture(|| {
                let mut parser = MoodleToFp::new();
                parser.render("{=floor(1} {=expm1({x_1})}");
            });
            let lines: Vec<_> = logs.lines().collect();
            assert_eq!(lines.len(), 2, "{}", logs);
            assert!(lines.iter().any(|line| line.contains("WARN") && line.contains("x1")));
            assert!(lines.iter().any(|line| line.contains("ERROR") && line.contains("expm1")));
            assert!(!logs.contains("floor"));
        }
    }
}
