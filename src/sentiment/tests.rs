//! Tests for sentiment result types

#[cfg(test)]
mod tests {
    use super::super::{FieldNaming, Label, LexiconAnalyzer, Probabilities, SentimentResult};

    #[test]
    fn test_label_order() {
        assert_eq!(
            Label::ALL,
            [Label::Negative, Label::Neutral, Label::Positive]
        );
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Negative.to_string(), "negative");
        assert_eq!(Label::Neutral.to_string(), "neutral");
        assert_eq!(Label::Positive.to_string(), "positive");
    }

    #[test]
    fn test_label_from_model_label() {
        assert_eq!(Label::from_model_label("POSITIVE"), Label::Positive);
        assert_eq!(Label::from_model_label("NEGATIVE"), Label::Negative);
        assert_eq!(Label::from_model_label("very positive"), Label::Positive);
        assert_eq!(Label::from_model_label("LABEL_1"), Label::Neutral);
        assert_eq!(Label::from_model_label("neutral"), Label::Neutral);
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&Label::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: Label = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(back, Label::Negative);
    }

    #[test]
    fn test_probabilities_add_and_sum() {
        let mut probs = Probabilities::default();
        probs.add(Label::Positive, 0.25);
        probs.add(Label::Positive, 0.5);
        probs.add(Label::Negative, 0.25);
        assert_eq!(probs.get(Label::Positive), 0.75);
        assert_eq!(probs.get(Label::Neutral), 0.0);
        assert!((probs.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_result_score_follows_label() {
        let result = SentimentResult::new(
            "meh".to_string(),
            Label::Neutral,
            Probabilities::new(0.3, 0.4, 0.3),
        );
        assert_eq!(result.score, 0.4);
    }

    #[test]
    fn test_label_score_shape() {
        let result = SentimentResult::new(
            "great".to_string(),
            Label::Positive,
            Probabilities::new(0.1, 0.3, 0.6),
        );
        let json = result.to_json(FieldNaming::LabelScore).unwrap();
        assert_eq!(json["text"], "great");
        assert_eq!(json["label"], "positive");
        assert_eq!(json["score"], 0.6);
        assert_eq!(json["probabilities"]["negative"], 0.1);
        assert_eq!(json["probabilities"]["neutral"], 0.3);
        assert_eq!(json["probabilities"]["positive"], 0.6);
        assert!(json.get("sentiment").is_none());
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn test_sentiment_confidence_shape() {
        let result = SentimentResult::new(
            "awful".to_string(),
            Label::Negative,
            Probabilities::new(0.6, 0.3, 0.1),
        );
        let json = result.to_json(FieldNaming::SentimentConfidence).unwrap();
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["confidence"], 0.6);
        assert!(json.get("label").is_none());
        assert!(json.get("score").is_none());
    }

    #[test]
    fn test_lexicon_distributions_are_normalized() {
        let analyzer = LexiconAnalyzer::new();
        let samples = [
            "",
            "I really love this product, it's amazing!",
            "This is the worst experience I've ever had.",
            "The product arrived on time.",
            "good and bad",
            "great great best",
            "terrible",
            "poor useless wrong",
        ];
        for text in samples {
            let result = analyzer.predict(text);
            assert!((result.probabilities.sum() - 1.0).abs() < 1e-9, "{text}");
            assert_eq!(result.score, result.probabilities.get(result.label));
            assert!((0.0..=1.0).contains(&result.score));
        }
    }
}
