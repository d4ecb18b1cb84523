use cryptolog_cli::config::ConfigError;
use cryptolog_cli::errors::AppError;
use cryptolog_core::CryptologError;

#[test]
fn app_error_from_core_pattern() {
    let app: AppError = CryptologError::InvalidPattern("unclosed group".into()).into();
    assert!(matches!(app, AppError::Core(CryptologError::InvalidPattern(_))));
    assert_eq!(app.to_string(), "Invalid pattern: unclosed group");
}

#[test]
fn app_error_from_config() {
    let app: AppError = ConfigError::InvalidDuration {
        input: "soon".into(),
        reason: "expected a number".into(),
    }
    .into();
    assert!(matches!(app, AppError::Config(ConfigError::InvalidDuration { .. })));
    assert!(app.to_string().starts_with("config error: invalid duration"));
}

#[test]
fn output_error_names_path() {
    let app = AppError::Output {
        path: "/root/out.log".into(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(app.to_string(), "cannot create output file /root/out.log: denied");
}
