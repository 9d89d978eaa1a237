use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransitError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed input at byte {position}: {message}")]
    MalformedInput { position: usize, message: String },

    #[error("{element} without a {attribute} attribute")]
    MissingRequiredAttribute { element: String, attribute: String },

    #[error("Unknown token '{token}' in expression")]
    UnresolvableToken { token: String },

    #[error("Constant '{name}' is not a number (value '{value}')")]
    NonNumericConstant { name: String, value: String },

    #[error("Insufficient stack arguments for operation '{operator}'")]
    StackUnderflow { operator: String },

    #[error("Invalid expression evaluation: '{expression}' left {remaining} values on the stack")]
    MalformedExpressionResult { expression: String, remaining: usize },

    #[error("Unknown operation '{operator}'")]
    UnknownOperator { operator: String },

    #[error("Expression '{expression}' is missing its closing '}}'")]
    UnterminatedExpression { expression: String },

    #[error("Integer literal '{token}' is out of range")]
    IntegerOutOfRange { token: String },

    #[error("Arithmetic overflow in operation '{operator}'")]
    ArithmeticOverflow { operator: String },

    #[error("Division by zero in operation '{operator}'")]
    DivisionByZero { operator: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The document itself is unusable or incomplete.
    Document,
    /// An embedded expression could not be evaluated.
    Expression,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad input; fixing the document or configuration resolves it.
    High,
    /// The environment failed (filesystem, permissions).
    Critical,
}

impl TransitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TransitError::IoError(_) => ErrorCategory::System,
            TransitError::MalformedInput { .. } | TransitError::MissingRequiredAttribute { .. } => {
                ErrorCategory::Document
            }
            TransitError::UnresolvableToken { .. }
            | TransitError::NonNumericConstant { .. }
            | TransitError::StackUnderflow { .. }
            | TransitError::MalformedExpressionResult { .. }
            | TransitError::UnknownOperator { .. }
            | TransitError::UnterminatedExpression { .. }
            | TransitError::IntegerOutOfRange { .. }
            | TransitError::ArithmeticOverflow { .. }
            | TransitError::DivisionByZero { .. } => ErrorCategory::Expression,
            TransitError::ConfigError { .. }
            | TransitError::MissingConfigError { .. }
            | TransitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::System => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// The identifier or token the error is about, when there is one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            TransitError::UnresolvableToken { token } | TransitError::IntegerOutOfRange { token } => {
                Some(token.as_str())
            }
            TransitError::NonNumericConstant { name, .. } => Some(name.as_str()),
            TransitError::StackUnderflow { operator }
            | TransitError::UnknownOperator { operator }
            | TransitError::ArithmeticOverflow { operator }
            | TransitError::DivisionByZero { operator } => Some(operator.as_str()),
            TransitError::MalformedExpressionResult { expression, .. }
            | TransitError::UnterminatedExpression { expression } => Some(expression.as_str()),
            TransitError::MissingRequiredAttribute { element, .. } => Some(element.as_str()),
            TransitError::MissingConfigError { field }
            | TransitError::InvalidConfigValueError { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Document => format!("The input document is invalid: {}", self),
            ErrorCategory::Expression => format!("An expression could not be evaluated: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::System => format!("A system error occurred: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TransitError::IoError(_) => "Check that the input file exists and the output location is writable",
            TransitError::MalformedInput { .. } => "Make sure the document is well-formed XML with a single root element",
            TransitError::MissingRequiredAttribute { .. } => {
                "Add a non-empty name attribute to every const and dict, and a key attribute to every item"
            }
            TransitError::UnresolvableToken { .. } => "Declare the constant in the constants section or fix the token spelling",
            TransitError::NonNumericConstant { .. } => "Only constants holding integer values can be used in expressions",
            TransitError::StackUnderflow { .. } | TransitError::MalformedExpressionResult { .. } => {
                "Expressions are postfix: every operator needs two operands before it and one value must remain"
            }
            TransitError::UnknownOperator { .. } => "Supported operations are +, -, *, max() and mod()",
            TransitError::UnterminatedExpression { .. } => "Close the expression with '}'",
            TransitError::IntegerOutOfRange { .. } | TransitError::ArithmeticOverflow { .. } => {
                "Values must fit into a signed 64-bit integer"
            }
            TransitError::DivisionByZero { .. } => "The right operand of mod() must not be zero",
            TransitError::ConfigError { .. }
            | TransitError::MissingConfigError { .. }
            | TransitError::InvalidConfigValueError { .. } => {
                "Check the command line arguments and the configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
