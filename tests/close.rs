#[cfg(test)]
mod tests {
    use eqtrack::commands::close::NoticeChoice;

    #[test]
    fn test_flags_pick_the_notice_choice() {
        assert_eq!(NoticeChoice::from_flags(true, false), NoticeChoice::Send);
        assert_eq!(NoticeChoice::from_flags(false, true), NoticeChoice::Skip);
        assert_eq!(NoticeChoice::from_flags(false, false), NoticeChoice::Ask);
    }

    #[test]
    fn test_flags_never_prompt() {
        assert!(NoticeChoice::Send.resolve(|| panic!("should not ask")));
        assert!(!NoticeChoice::Skip.resolve(|| panic!("should not ask")));
    }

    #[test]
    fn test_answer_is_followed() {
        assert!(NoticeChoice::Ask.resolve(|| Ok(true)));
        assert!(!NoticeChoice::Ask.resolve(|| Ok(false)));
    }

    #[test]
    fn test_prompt_without_terminal_skips_the_notice() {
        let sent = NoticeChoice::Ask.resolve(|| Err(anyhow::anyhow!("not a terminal")));
        assert!(!sent);
    }
}
