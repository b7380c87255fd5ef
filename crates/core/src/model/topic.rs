use std::collections::HashSet;

use crate::model::Question;

/// Topic lookup over an ordered question bank.
///
/// Topics keep the order in which they first appear in the bank, and the
/// questions of a topic keep bank order.
#[derive(Debug, Clone)]
pub struct TopicIndex<'a> {
    questions: &'a [Question],
    topics: Vec<&'a str>,
}

impl<'a> TopicIndex<'a> {
    #[must_use]
    pub fn new(questions: &'a [Question]) -> Self {
        let mut seen = HashSet::new();
        let topics = questions
            .iter()
            .map(Question::topic)
            .filter(|topic| seen.insert(*topic))
            .collect();
        Self { questions, topics }
    }

    /// Distinct topics in first-seen order.
    #[must_use]
    pub fn topics(&self) -> &[&'a str] {
        &self.topics
    }

    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains(&topic)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Questions belonging to `topic`, in bank order. Unknown topics yield an empty list.
    #[must_use]
    pub fn questions_for(&self, topic: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.topic() == topic)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count_for(&self, topic: &str) -> usize {
        self.questions.iter().filter(|q| q.topic() == topic).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn question(id: &str, topic: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            topic,
            format!("Question {id}"),
            vec!["a".into(), "b".into()],
            0,
            "",
        )
        .unwrap()
    }

    #[test]
    fn topics_keep_first_seen_order() {
        let bank = vec![
            question("Q1", "Version Control Systems"),
            question("Q2", "Continuous Integration"),
            question("Q3", "Version Control Systems"),
            question("Q4", "DevOps Culture"),
        ];
        let index = TopicIndex::new(&bank);

        assert_eq!(
            index.topics(),
            &["Version Control Systems", "Continuous Integration", "DevOps Culture"]
        );
        assert!(index.contains("DevOps Culture"));
        assert!(!index.contains("Kubernetes"));
    }

    #[test]
    fn questions_for_is_a_stable_filter() {
        let bank = vec![
            question("Q1", "A"),
            question("Q2", "B"),
            question("Q3", "A"),
            question("Q4", "A"),
        ];
        let index = TopicIndex::new(&bank);

        let ids: Vec<_> = index
            .questions_for("A")
            .iter()
            .map(|q| q.id().as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["Q1", "Q3", "Q4"]);
        assert_eq!(index.count_for("A"), 3);
        assert!(index.questions_for("missing").is_empty());
    }

    #[test]
    fn empty_bank_has_no_topics() {
        let index = TopicIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.count_for("A"), 0);
    }
}
