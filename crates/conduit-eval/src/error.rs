/// Failures raised while a program is running.
///
/// None of these carry source positions; by the time they surface, the
/// offending expression may be a synthesized node with a borrowed span.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvalError {
    #[display("unknown identifier `{name}`")]
    UnknownIdentifier { name: String },

    #[display("a {found} is not callable")]
    NotCallable { found: &'static str },

    #[display("{name} takes {expected} arguments, {given} given")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },

    #[display("pipe takes at most {max} stages, {given} given")]
    TooManyStages { given: usize, max: usize },

    #[display("cannot {operation} a {found}")]
    TypeMismatch {
        operation: &'static str,
        found: &'static str,
    },

    #[display("division by zero")]
    DivisionByZero,

    #[display("spread argument is a {found}, not a list")]
    SpreadNotAList { found: &'static str },

    /// Spread is only meaningful inside a call's argument list.
    #[display("spread expression outside a call")]
    SpreadOutsideCall,
}
