use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::{debug, info, warn};

use crate::checkpoint::{Checkpoint, CheckpointLayout};
use crate::circular_queue::CircularQueue;

const EVENT_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentProgress {
    pub next_index: usize,
    /// Completed wraps from the last checkpoint back to the first.
    pub laps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointEvent<A> {
    Correct { agent: A, checkpoint: usize },
    Wrong { agent: A, checkpoint: usize, expected: usize },
}

impl<A> CheckpointEvent<A> {
    #[inline]
    pub fn agent(&self) -> &A {
        match self {
            CheckpointEvent::Correct { agent, .. } => agent,
            CheckpointEvent::Wrong { agent, .. } => agent,
        }
    }

    #[inline]
    pub fn is_correct(&self) -> bool {
        matches!(self, CheckpointEvent::Correct { .. })
    }
}

/// Validates pass-through order of every agent around the checkpoint ring.
pub struct CheckpointSequencer<A> {
    checkpoints: Vec<Checkpoint>,
    agents: HashMap<A, AgentProgress>,
    events: CircularQueue<CheckpointEvent<A>>,
}

impl<A: Eq + Hash + Clone + fmt::Debug> CheckpointSequencer<A> {
    pub fn new<I: IntoIterator<Item = A>>(checkpoints: Vec<Checkpoint>, agents: I) -> Self {
        let mut sequencer = Self {
            checkpoints,
            agents: HashMap::new(),
            events: CircularQueue::with_capacity(EVENT_HISTORY),
        };

        for agent in agents {
            sequencer.register(agent);
        }

        sequencer
    }

    pub fn from_layout<I: IntoIterator<Item = A>>(layout: CheckpointLayout, agents: I) -> Self {
        Self::new(layout.checkpoints, agents)
    }

    #[inline]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Starts tracking `agent` at checkpoint 0; known agents keep their state.
    pub fn register(&mut self, agent: A) {
        self.agents.entry(agent).or_default();
    }

    #[inline]
    pub fn progress(&self, agent: &A) -> Option<AgentProgress> {
        self.agents.get(agent).copied()
    }

    /// Handles `agent` passing through the checkpoint at `index`.
    pub fn pass_through(&mut self, index: usize, agent: &A) -> CheckpointEvent<A> {
        let count = self.checkpoints.len();

        if !self.agents.contains_key(agent) {
            info!("Added new agent to tracking: {:?}", agent);
        }
        let progress = self.agents.entry(agent.clone()).or_default();

        let expected = progress.next_index;

        let event = if count > 0 && index == expected {
            progress.next_index = (expected + 1) % count;
            if progress.next_index == 0 {
                progress.laps += 1;
            }

            debug!("{:?} passed checkpoint {} correctly", agent, index);

            CheckpointEvent::Correct {
                agent: agent.clone(),
                checkpoint: index,
            }
        } else {
            debug!("{:?} passed checkpoint {}, expected {}", agent, index, expected);

            CheckpointEvent::Wrong {
                agent: agent.clone(),
                checkpoint: index,
                expected,
            }
        };

        if self.events.push(event.clone()).is_some() {
            debug!("checkpoint event history full, dropped oldest entry");
        }

        event
    }

    /// The checkpoint `agent` has to reach next. Unknown agents are pointed at
    /// the first checkpoint.
    pub fn next_checkpoint(&self, agent: &A) -> Option<&Checkpoint> {
        let index = match self.agents.get(agent) {
            Some(progress) => progress.next_index,
            None => {
                warn!("Agent {:?} is not tracked", agent);
                0
            }
        };

        self.checkpoints.get(index)
    }

    /// Sends `agent` back to checkpoint 0 (lap or episode reset).
    pub fn reset(&mut self, agent: &A) {
        if let Some(progress) = self.agents.get_mut(agent) {
            *progress = AgentProgress::default();
        }
    }

    pub fn reset_all(&mut self) {
        self.agents.values_mut().for_each(|p| *p = AgentProgress::default());
        self.events.clear();
    }

    /// Recent events, oldest first.
    #[inline]
    pub fn recent_events(&self) -> impl Iterator<Item = &CheckpointEvent<A>> {
        self.events.asc_iter()
    }

    #[inline]
    pub fn latest_event(&self) -> Option<&CheckpointEvent<A>> {
        self.events.iter().next()
    }

    #[inline]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Takes the pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<CheckpointEvent<A>> {
        self.events.drain().collect()
    }
}
