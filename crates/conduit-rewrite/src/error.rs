use conduit_core::Span;

/// Failures raised while rewriting pipe invocations.
///
/// All of these surface at optimization time, before any user code runs.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RewriteError {
    /// An anonymous stage never references its parameter, so there is
    /// nothing to thread the pipe value through.
    #[display("lambda stage never references its parameter")]
    UnreferencedParameter { span: Span },

    /// More than one parameter reference was found but no subsequent
    /// replacement was supplied. The pipe rewriter always supplies one, so
    /// this surfacing to a caller indicates a defect in the rewriter.
    #[display("lambda references its parameter more than once but no subsequent replacement was supplied")]
    MissingSecondary { span: Span },

    /// The stage list is built with a spread, so the stages cannot be
    /// statically enumerated.
    #[display("pipe can't take a spread expression as an argument when fast_pipes is used")]
    SpreadInPipe { span: Span },

    /// Anonymous stages must take exactly one parameter.
    #[display("pipe lambda stages must take exactly one parameter, found {count}")]
    NotAUnaryLambda { count: usize, span: Span },

    /// More stages than the fixed maximum.
    #[display("pipe takes at most {max} stages, found {found}")]
    TooManyStages { found: usize, max: usize, span: Span },
}

impl RewriteError {
    pub fn span(&self) -> Span {
        match self {
            RewriteError::UnreferencedParameter { span }
            | RewriteError::MissingSecondary { span }
            | RewriteError::SpreadInPipe { span }
            | RewriteError::NotAUnaryLambda { span, .. }
            | RewriteError::TooManyStages { span, .. } => *span,
        }
    }
}
