/// Counter used to discard results of async calls whose initiator is gone.
///
/// Each call takes a [`Ticket`] before awaiting. Starting a newer call or
/// invalidating the flow makes every older ticket stale.
#[derive(Debug, Default)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn begin(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    pub fn invalidate(&mut self) {
        self.0 += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_is_current_until_invalidated() {
        let mut generation = Generation::default();
        let ticket = generation.begin();
        assert!(generation.is_current(ticket));

        generation.invalidate();
        assert!(!generation.is_current(ticket));
    }

    #[test]
    fn test_newer_call_supersedes_older() {
        let mut generation = Generation::default();
        let first = generation.begin();
        let second = generation.begin();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }
}
