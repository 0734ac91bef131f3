use std::collections::VecDeque;

pub const DEFAULT_MAX_TURNS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
}

#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    max_turns: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl ConversationMemory {
    pub fn new(max_turns: usize) -> Self {
        let max_turns = max_turns.max(1);
        Self {
            turns: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn add_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push_back(ConversationTurn {
            user: user.into(),
            assistant: assistant.into(),
        });
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    pub fn get_context(&self, n_turns: usize) -> String {
        let skip = self.turns.len().saturating_sub(n_turns);
        self.turns
            .iter()
            .skip(skip)
            .flat_map(|turn| {
                [
                    format!("User: {}", turn.user),
                    format!("Assistant: {}", turn.assistant),
                ]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
