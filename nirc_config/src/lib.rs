mod secret;
pub use secret::Secret;

mod env;
pub use env::{load_from_env, Assign, LoadFromEnv};

pub fn redact(s: &str) -> impl std::fmt::Debug {
    struct NoDebug(String);
    impl std::fmt::Debug for NoDebug {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    NoDebug(format!("{{len = {}}}", s.len()))
}

#[cfg(test)]
mod tests {
    #[test]
    fn redact_only_shows_length() {
        let out = format!("{:?}", super::redact("hunter2"));
        assert_eq!(out, "{len = 7}");
    }
}
