use tracing::warn;

/// Result of a read that is allowed to degrade: store failures on list/get
/// paths log a warning and return an empty value instead of failing the
/// request. Write paths never use this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<T> {
    Fresh(T),
    Degraded(T),
}

impl<T> Fetch<T> {
    pub fn into_inner(self) -> T {
        match self {
            Fetch::Fresh(v) | Fetch::Degraded(v) => v,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetch::Degraded(_))
    }
}

/// Soften a fallible read into `Fetch`, substituting the default value when
/// the store is unreachable.
pub fn soften<T: Default>(res: anyhow::Result<T>, what: &str) -> Fetch<T> {
    match res {
        Ok(v) => Fetch::Fresh(v),
        Err(e) => {
            warn!(error = %e, what, "read degraded to empty");
            Fetch::Degraded(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_reads_stay_fresh() {
        let f = soften(Ok(vec![1, 2, 3]), "numbers");
        assert!(!f.is_degraded());
        assert_eq!(f.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn failed_reads_degrade_to_default() {
        let f: Fetch<Vec<i32>> = soften(Err(anyhow::anyhow!("store down")), "numbers");
        assert!(f.is_degraded());
        assert!(f.into_inner().is_empty());
    }
}
