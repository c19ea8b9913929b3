//! Cycle Selector - which agent and rail are active on a given cycle
//!
//! Both selections are independent round-robin sequences indexed by the
//! cycle number alone, so any two observers of the same cycle agree.

use hero_core::{validate_order, HeroConfig, HeroResult, AGENT_COUNT, RAIL_COUNT};
use serde::{Deserialize, Serialize};

/// Active slots for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSlots {
    /// Agent slot in `0..AGENT_COUNT`
    pub agent: usize,
    /// Rail slot in `0..RAIL_COUNT`
    pub rail: usize,
}

/// Round-robin slot selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSelector {
    agent_order: Vec<usize>,
    rail_order: Vec<usize>,
}

impl CycleSelector {
    pub fn new(agent_order: Vec<usize>, rail_order: Vec<usize>) -> HeroResult<Self> {
        validate_order("agent", &agent_order, AGENT_COUNT)?;
        validate_order("rail", &rail_order, RAIL_COUNT)?;
        Ok(CycleSelector {
            agent_order,
            rail_order,
        })
    }

    pub fn from_config(config: &HeroConfig) -> HeroResult<Self> {
        Self::new(config.agent_order.clone(), config.rail_order.clone())
    }

    pub fn agent_for(&self, cycle_index: u64) -> usize {
        pick(&self.agent_order, cycle_index)
    }

    pub fn rail_for(&self, cycle_index: u64) -> usize {
        pick(&self.rail_order, cycle_index)
    }

    pub fn select(&self, cycle_index: u64) -> ActiveSlots {
        ActiveSlots {
            agent: self.agent_for(cycle_index),
            rail: self.rail_for(cycle_index),
        }
    }

    /// Number of cycles before the (agent, rail) pairing repeats
    pub fn period(&self) -> usize {
        lcm(self.agent_order.len(), self.rail_order.len())
    }
}

impl Default for CycleSelector {
    fn default() -> Self {
        let config = HeroConfig::default();
        CycleSelector {
            agent_order: config.agent_order,
            rail_order: config.rail_order,
        }
    }
}

fn pick(order: &[usize], cycle_index: u64) -> usize {
    // Non-empty by construction
    order[(cycle_index % order.len() as u64) as usize]
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_core::HeroError;

    #[test]
    fn test_default_agent_rotation() {
        let selector = CycleSelector::default();
        let agents: Vec<usize> = (0..7).map(|c| selector.agent_for(c)).collect();
        assert_eq!(agents, vec![1, 2, 0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_default_rail_alternates() {
        let selector = CycleSelector::default();
        let rails: Vec<usize> = (0..6).map(|c| selector.rail_for(c)).collect();
        assert_eq!(rails, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_selection_is_independent() {
        let selector = CycleSelector::default();
        assert_eq!(selector.period(), 6);

        let pairs: Vec<ActiveSlots> = (0..6).map(|c| selector.select(c)).collect();
        // Every (agent, rail) pair appears exactly once per period
        for agent in 0..AGENT_COUNT {
            for rail in 0..RAIL_COUNT {
                let hits = pairs
                    .iter()
                    .filter(|s| s.agent == agent && s.rail == rail)
                    .count();
                assert_eq!(hits, 1, "agent {agent} rail {rail}");
            }
        }
        assert_eq!(selector.select(6), selector.select(0));
    }

    #[test]
    fn test_huge_cycle_index() {
        let selector = CycleSelector::default();
        let slots = selector.select(u64::MAX);
        assert!(slots.agent < AGENT_COUNT);
        assert!(slots.rail < RAIL_COUNT);
    }

    #[test]
    fn test_invalid_orders_rejected() {
        assert_eq!(
            CycleSelector::new(vec![], vec![0]),
            Err(HeroError::EmptyOrder("agent"))
        );
        assert!(matches!(
            CycleSelector::new(vec![0, 3], vec![0]),
            Err(HeroError::SlotOutOfRange { slot: 3, .. })
        ));
    }
}
