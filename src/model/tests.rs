//! Tests for the pretrained model adapter

#[cfg(test)]
mod tests {
    use super::super::{
        softmax, LabelMap, MockSequenceClassifier, PretrainedAnalyzer, SequenceClassifier,
    };
    use crate::error::{Result, ServiceError};
    use crate::sentiment::{Label, LexiconAnalyzer};
    use std::collections::BTreeMap;

    fn names(pairs: &[(usize, &str)]) -> BTreeMap<usize, String> {
        pairs.iter().map(|(i, n)| (*i, n.to_string())).collect()
    }

    fn mock_with(
        id2label: Option<BTreeMap<usize, String>>,
        logits: Vec<f32>,
    ) -> MockSequenceClassifier {
        let mut mock = MockSequenceClassifier::new();
        mock.expect_id2label().return_const(id2label);
        mock.expect_logits().returning(move |_| Ok(logits.clone()));
        mock
    }

    fn sst2_names() -> BTreeMap<usize, String> {
        names(&[(0, "NEGATIVE"), (1, "POSITIVE")])
    }

    // ============ softmax ============

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_is_stable_for_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[1] - 0.5).abs() < 1e-12);
    }

    // ============ label mapping ============

    #[test]
    fn test_label_map_defaults_to_binary() {
        assert_eq!(LabelMap::from_id2label(None), LabelMap::binary());
        assert_eq!(
            LabelMap::from_id2label(Some(&BTreeMap::new())),
            LabelMap::binary()
        );
        let map = LabelMap::binary();
        assert_eq!(map.get(0), Some(Label::Negative));
        assert_eq!(map.get(1), Some(Label::Positive));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_binary_distribution() {
        let map = LabelMap::from_id2label(Some(&sst2_names()));
        let (label, probs) = map.distribute(&[0.2, 0.8]).unwrap();
        assert_eq!(label, Label::Positive);
        assert_eq!(probs.negative, 0.2);
        assert_eq!(probs.neutral, 0.0);
        assert_eq!(probs.positive, 0.8);
    }

    #[test]
    fn test_binary_distribution_with_swapped_names() {
        let map = LabelMap::from_id2label(Some(&names(&[(0, "POSITIVE"), (1, "NEGATIVE")])));
        let (label, probs) = map.distribute(&[0.7, 0.3]).unwrap();
        assert_eq!(label, Label::Positive);
        assert_eq!(probs.positive, 0.7);
        assert_eq!(probs.negative, 0.3);
    }

    #[test]
    fn test_binary_distribution_with_opaque_names_is_positional() {
        let map = LabelMap::from_id2label(Some(&names(&[(0, "LABEL_0"), (1, "LABEL_1")])));
        let (label, probs) = map.distribute(&[0.9, 0.1]).unwrap();
        assert_eq!(label, Label::Negative);
        assert_eq!(probs.negative, 0.9);
        assert_eq!(probs.positive, 0.1);
    }

    #[test]
    fn test_three_class_distribution() {
        let map = LabelMap::from_id2label(Some(&names(&[
            (0, "negative"),
            (1, "neutral"),
            (2, "positive"),
        ])));
        let (label, probs) = map.distribute(&[0.1, 0.6, 0.3]).unwrap();
        assert_eq!(label, Label::Neutral);
        assert_eq!(probs.negative, 0.1);
        assert_eq!(probs.neutral, 0.6);
        assert_eq!(probs.positive, 0.3);
    }

    #[test]
    fn test_wide_output_aggregates_per_label() {
        // Star ratings style head: two negative-ish, one neutral, two positive-ish
        let map = LabelMap::from_id2label(Some(&names(&[
            (0, "very negative"),
            (1, "negative"),
            (2, "neutral"),
            (3, "positive"),
            (4, "very positive"),
        ])));
        let (label, probs) = map.distribute(&[0.05, 0.05, 0.1, 0.35, 0.45]).unwrap();
        assert_eq!(label, Label::Positive);
        assert!((probs.positive - 0.8).abs() < 1e-12);
        assert!((probs.negative - 0.1).abs() < 1e-12);
        assert!((probs.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_output_is_inference_error() {
        let err = LabelMap::binary().distribute(&[]).unwrap_err();
        assert!(matches!(err, ServiceError::Inference(_)));
    }

    #[test]
    fn test_nan_output_is_inference_error() {
        let err = LabelMap::binary().distribute(&[f64::NAN, 0.5]).unwrap_err();
        assert!(matches!(err, ServiceError::Inference(_)));
    }

    // ============ analyzer ============

    #[test]
    fn test_predict_positive() {
        let analyzer = PretrainedAnalyzer::new(
            "mock".to_string(),
            Box::new(mock_with(Some(sst2_names()), vec![-2.0, 3.0])),
        );
        let result = analyzer.predict("I Love It");
        assert_eq!(result.text, "i love it");
        assert_eq!(result.label, Label::Positive);
        assert!(result.score > 0.99);
        assert_eq!(result.score, result.probabilities.positive);
        assert_eq!(result.probabilities.neutral, 0.0);
        assert!((result.probabilities.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_negative() {
        let analyzer = PretrainedAnalyzer::new(
            "mock".to_string(),
            Box::new(mock_with(Some(sst2_names()), vec![4.0, -1.0])),
        );
        let result = analyzer.predict("worst purchase ever");
        assert_eq!(result.label, Label::Negative);
        assert_eq!(result.score, result.probabilities.negative);
    }

    #[test]
    fn test_model_sees_lowercased_text() {
        let mut mock = MockSequenceClassifier::new();
        mock.expect_id2label().return_const(None::<BTreeMap<usize, String>>);
        mock.expect_logits()
            .withf(|text| text == "shouting text")
            .times(1)
            .returning(|_| Ok(vec![0.0, 1.0]));
        let analyzer = PretrainedAnalyzer::new("mock".to_string(), Box::new(mock));
        analyzer.predict("SHOUTING TEXT");
    }

    #[test]
    fn test_inference_failure_falls_back_to_lexicon() {
        let mut mock = MockSequenceClassifier::new();
        mock.expect_id2label().return_const(Some(sst2_names()));
        mock.expect_logits()
            .returning(|_| Err(ServiceError::Inference("boom".to_string())));
        let analyzer = PretrainedAnalyzer::new("mock".to_string(), Box::new(mock));

        let text = "I really love this product, it's amazing!";
        let result = analyzer.predict(text);
        assert_eq!(result, LexiconAnalyzer::new().predict(text));
        assert_eq!(result.label, Label::Positive);
        assert_eq!(result.score, 0.8);
    }

    #[test]
    fn test_tokenization_failure_falls_back_to_lexicon() {
        let mut mock = MockSequenceClassifier::new();
        mock.expect_id2label().return_const(None::<BTreeMap<usize, String>>);
        mock.expect_logits()
            .returning(|_| Err(ServiceError::Tokenization("bad input".to_string())));
        let analyzer = PretrainedAnalyzer::new("mock".to_string(), Box::new(mock));

        let result = analyzer.predict("The product arrived on time.");
        assert_eq!(result.label, Label::Neutral);
    }

    #[test]
    fn test_empty_logits_fall_back_to_lexicon() {
        let analyzer = PretrainedAnalyzer::new(
            "mock".to_string(),
            Box::new(mock_with(None, vec![])),
        );
        let result = analyzer.predict("terrible");
        assert_eq!(result.label, Label::Negative);
    }

    /// Classifier whose forward pass panics, as candle does on shape mismatches
    struct PanickingClassifier;

    impl SequenceClassifier for PanickingClassifier {
        fn logits(&self, _text: &str) -> Result<Vec<f32>> {
            panic!("shape mismatch in forward pass")
        }

        fn id2label(&self) -> Option<BTreeMap<usize, String>> {
            Some(sst2_names())
        }
    }

    #[test]
    fn test_panicking_model_falls_back_to_lexicon() {
        let analyzer = PretrainedAnalyzer::new("mock".to_string(), Box::new(PanickingClassifier));

        for text in [
            "I really love this product, it's amazing!",
            "This is terrible and awful.",
            "The product arrived on time.",
        ] {
            assert_eq!(analyzer.predict(text), LexiconAnalyzer::new().predict(text));
        }
    }

    #[test]
    fn test_analyzer_survives_a_panicking_prediction() {
        let analyzer = PretrainedAnalyzer::new("mock".to_string(), Box::new(PanickingClassifier));
        let first = analyzer.predict("great");
        let second = analyzer.predict("great");
        assert_eq!(first, second);
        assert_eq!(first.label, Label::Positive);
    }

    #[test]
    fn test_try_predict_surfaces_errors() {
        let mut mock = MockSequenceClassifier::new();
        mock.expect_id2label().return_const(None::<BTreeMap<usize, String>>);
        mock.expect_logits()
            .returning(|_| Err(ServiceError::Inference("boom".to_string())));
        let analyzer = PretrainedAnalyzer::new("mock".to_string(), Box::new(mock));
        assert!(analyzer.try_predict("anything").is_err());
    }

    #[test]
    fn test_model_name_and_labels() {
        let analyzer = PretrainedAnalyzer::new(
            "distilbert-test".to_string(),
            Box::new(mock_with(Some(sst2_names()), vec![0.0, 0.0])),
        );
        assert_eq!(analyzer.model_name(), "distilbert-test");
        assert_eq!(analyzer.labels(), &LabelMap::binary());
    }
}
