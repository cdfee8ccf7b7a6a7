use crate::error::CliError;
use crate::exit_codes;

pub fn error_exit_code(error: &CliError) -> i32 {
    match error {
        CliError::MissingApiKey => exit_codes::AUTH_REQUIRED,
        CliError::UnknownAction { .. }
        | CliError::MissingArgument { .. }
        | CliError::InvalidArgument { .. }
        | CliError::Config(_) => exit_codes::USAGE_ERROR,
        CliError::FileRead { .. } | CliError::FileParse { .. } | CliError::InvalidPayload { .. } => {
            exit_codes::INPUT_ERROR
        }
        CliError::ResponseParse(_) => exit_codes::RESPONSE_ERROR,
        CliError::HttpStatus { .. } => exit_codes::REQUEST_FAILED,
        CliError::Transport(_) => exit_codes::NETWORK_ERROR,
    }
}

pub fn is_usage_exit(exit_code: i32) -> bool {
    exit_code == exit_codes::USAGE_ERROR
}
