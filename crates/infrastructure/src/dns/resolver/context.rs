use triedns_domain::DomainError;

/// State of one resolution: how many upstream sends it has made so far.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    ceiling: u32,
    queries_sent: u32,
}

impl ResolutionContext {
    pub fn new(ceiling: u32) -> Self {
        Self {
            ceiling,
            queries_sent: 0,
        }
    }

    /// Called before every send. Fails once the count passes the ceiling,
    /// so a ceiling of 0 forbids any I/O.
    pub fn charge_query(&mut self) -> Result<(), DomainError> {
        self.queries_sent += 1;
        if self.queries_sent > self.ceiling {
            return Err(DomainError::TooManyQueries {
                limit: self.ceiling,
            });
        }
        Ok(())
    }

    /// Fails when the next send would pass the ceiling, without counting one.
    pub fn ensure_budget(&self) -> Result<(), DomainError> {
        if self.queries_sent >= self.ceiling {
            return Err(DomainError::TooManyQueries {
                limit: self.ceiling,
            });
        }
        Ok(())
    }

    pub fn queries_sent(&self) -> u32 {
        self.queries_sent
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_allows_exactly_limit_queries() {
        let mut ctx = ResolutionContext::new(2);
        assert!(ctx.charge_query().is_ok());
        assert!(ctx.charge_query().is_ok());
        assert!(matches!(
            ctx.charge_query(),
            Err(DomainError::TooManyQueries { limit: 2 })
        ));
    }

    #[test]
    fn test_zero_ceiling_rejects_first_query() {
        let mut ctx = ResolutionContext::new(0);
        assert!(ctx.ensure_budget().is_err());
        assert!(ctx.charge_query().is_err());
    }

    #[test]
    fn test_ensure_budget_does_not_count() {
        let mut ctx = ResolutionContext::new(1);
        assert!(ctx.ensure_budget().is_ok());
        assert_eq!(ctx.queries_sent(), 0);
        ctx.charge_query().unwrap();
        assert!(ctx.ensure_budget().is_err());
    }
}
