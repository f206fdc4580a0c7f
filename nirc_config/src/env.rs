use anyhow::Context;

pub type Assign<T> = fn(&mut T, String);

/// Builds a `T` from environment variables.
///
/// Every `required` key must be set. `optional` keys are only assigned when
/// they are present.
pub fn load_from_env<T: Default + std::fmt::Debug>(
    required: &[(&str, Assign<T>)],
    optional: &[(&str, Assign<T>)],
) -> anyhow::Result<T> {
    let get = |key| {
        log::trace!("looking up {key}");
        let res = std::env::var(key);
        res.with_context(|| anyhow::anyhow!("key '{key}' was not found"))
    };

    log::trace!("loading env vars for: {}", std::any::type_name::<T>());

    let this = required
        .iter()
        .try_fold(T::default(), |mut this, (key, func)| {
            func(&mut this, get(key)?);
            anyhow::Ok(this)
        })
        .map(|this| {
            optional.iter().fold(this, |mut this, (key, func)| {
                if let Ok(val) = get(key) {
                    func(&mut this, val)
                }
                this
            })
        });

    if let Ok(this) = &this {
        log::debug!("created: {:?}", this);
    }
    this
}

pub trait LoadFromEnv
where
    Self: Sized,
{
    fn load_from_env() -> anyhow::Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug)]
    struct Thing {
        name: String,
        extra: Option<String>,
    }

    #[test]
    fn required_and_optional() {
        std::env::set_var("NIRC_CONFIG_TEST_NAME", "alice");
        std::env::remove_var("NIRC_CONFIG_TEST_EXTRA");

        let thing = load_from_env::<Thing>(
            &[("NIRC_CONFIG_TEST_NAME", |t, v| t.name = v)],
            &[("NIRC_CONFIG_TEST_EXTRA", |t, v| t.extra = Some(v))],
        )
        .unwrap();

        assert_eq!(thing.name, "alice");
        assert!(thing.extra.is_none());
    }

    #[test]
    fn missing_required_key() {
        std::env::remove_var("NIRC_CONFIG_TEST_MISSING");
        let err = load_from_env::<Thing>(&[("NIRC_CONFIG_TEST_MISSING", |t, v| t.name = v)], &[])
            .unwrap_err();
        assert!(err.to_string().contains("NIRC_CONFIG_TEST_MISSING"));
    }
}
