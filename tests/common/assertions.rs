/// Command string assertion utilities
#[allow(dead_code)]
pub fn assert_cmd_contains(cmd: &str, fragment: &str) {
    assert!(
        cmd.contains(fragment),
        "Expected command to contain '{}' but it didn't.\nCommand: {}",
        fragment,
        cmd
    );
}

/// Check that a command string does NOT contain a fragment
#[allow(dead_code)]
pub fn assert_cmd_not_contains(cmd: &str, fragment: &str) {
    assert!(
        !cmd.contains(fragment),
        "Expected command to NOT contain '{}' but it did.\nCommand: {}",
        fragment,
        cmd
    );
}

/// Check if an argv has a flag immediately followed by a value
#[allow(dead_code)]
pub fn assert_arg_pair(args: &[String], flag: &str, value: &str) {
    let found = args.windows(2).any(|w| w[0] == flag && w[1] == value);
    assert!(
        found,
        "Expected argument pair '{} {}' but it was missing.\nArgs: {:?}",
        flag, value, args
    );
}

/// Check that an argv never contains a flag
#[allow(dead_code)]
pub fn assert_no_flag(args: &[String], flag: &str) {
    assert!(
        !args.iter().any(|a| a == flag),
        "Expected no '{}' flag.\nArgs: {:?}",
        flag,
        args
    );
}

/// Value following a flag in an argv (e.g. "6000k" for "-b:v")
#[allow(dead_code)]
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_flag_value() {
        let args = argv("ffmpeg -i input.mp4 -b:v 2000k out.m3u8");
        assert_eq!(flag_value(&args, "-b:v"), Some("2000k"));
        assert_eq!(flag_value(&args, "-nonexistent"), None);
    }

    #[test]
    #[should_panic(expected = "Expected argument pair")]
    fn test_assert_arg_pair_fails() {
        assert_arg_pair(&argv("ffmpeg -c:v copy"), "-c:v", "libx264");
    }
}
