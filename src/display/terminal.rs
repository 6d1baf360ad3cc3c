//! TTY detection and color support logic

use std::io::IsTerminal;

/// Determine if colors should be used based on environment and TTY status.
/// NO_COLOR (https://no-color.org/) wins over everything; CLICOLOR_FORCE
/// enables colors even when piped; CLICOLOR=0 disables; otherwise colors
/// follow whether stdout is a TTY.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    match std::env::var("CLICOLOR_FORCE") {
        Ok(val) if val != "0" => return true,
        _ => {}
    }

    match std::env::var("CLICOLOR") {
        Ok(val) if val == "0" => return false,
        _ => {}
    }

    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_color_env() {
        std::env::remove_var("NO_COLOR");
        std::env::remove_var("CLICOLOR_FORCE");
        std::env::remove_var("CLICOLOR");
    }

    #[test]
    #[serial]
    fn test_no_color_disables() {
        clear_color_env();

        std::env::set_var("NO_COLOR", "1");
        assert_eq!(should_use_colors(), false);
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    #[serial]
    fn test_clicolor_force_enables() {
        clear_color_env();

        std::env::set_var("CLICOLOR_FORCE", "1");
        assert_eq!(should_use_colors(), true);
        std::env::remove_var("CLICOLOR_FORCE");
    }

    #[test]
    #[serial]
    fn test_no_color_overrides_force() {
        clear_color_env();

        std::env::set_var("NO_COLOR", "1");
        std::env::set_var("CLICOLOR_FORCE", "1");
        assert_eq!(should_use_colors(), false);
        std::env::remove_var("NO_COLOR");
        std::env::remove_var("CLICOLOR_FORCE");
    }

    #[test]
    #[serial]
    fn test_clicolor_zero_disables() {
        clear_color_env();

        std::env::set_var("CLICOLOR", "0");
        assert_eq!(should_use_colors(), false);
        std::env::remove_var("CLICOLOR");
    }
}
