use sv_agent::chat::ConversationMemory;

#[test]
fn memory_evicts_oldest_turns_first() {
    let mut memory = ConversationMemory::new(3);
    for i in 0..7 {
        memory.add_turn(format!("q{i}"), format!("a{i}"));
        assert!(memory.len() <= 3);
    }
    let users: Vec<&str> = memory.turns().map(|turn| turn.user.as_str()).collect();
    assert_eq!(users, vec!["q4", "q5", "q6"]);
}

#[test]
fn context_renders_recent_turns_oldest_first() {
    let mut memory = ConversationMemory::new(10);
    memory.add_turn("first", "one");
    memory.add_turn("second", "two");
    memory.add_turn("third", "three");
    assert_eq!(
        memory.get_context(2),
        "User: second\nAssistant: two\nUser: third\nAssistant: three"
    );
    assert_eq!(memory.get_context(0), "");
}

#[test]
fn clear_empties_history() {
    let mut memory = ConversationMemory::default();
    memory.add_turn("q", "a");
    memory.clear();
    assert!(memory.is_empty());
    assert_eq!(memory.get_context(3), "");
}
