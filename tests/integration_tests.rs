//! Integration tests for the rknn library
//!
//! These tests verify end-to-end functionality across multiple modules
//! and validate real-world usage scenarios.

use approx::assert_relative_eq;
use rknn::api::{quick, KNN};
use rknn::{
    ClassLabel, Classifier, CsvDataset, DistanceFunction, EuclideanDistance,
    FeatureVector, InMemoryDatabase, KernelDistance, KnnClassifier, KnnError, LabeledInstance,
    Metric, ParameterSet, PolynomialKernel, SimilarityFunction,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn fv(values: &[f64]) -> FeatureVector {
    FeatureVector::from(values)
}

/// Small deterministic pseudo-random generator for reproducible vectors
fn lcg_vectors(seed: u64, count: usize, dim: usize) -> Vec<FeatureVector> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) * 20.0 - 10.0
    };
    (0..count)
        .map(|_| FeatureVector::new((0..dim).map(|_| next()).collect()))
        .collect()
}

fn labeled_database(vectors: &[FeatureVector], labels: &[&str]) -> InMemoryDatabase {
    let mut db = InMemoryDatabase::new();
    for (i, v) in vectors.iter().enumerate() {
        db.insert(v.clone(), labels[i % labels.len()].into()).unwrap();
    }
    db
}

/// Test complete workflow: CSV loading -> fitting -> evaluation
#[test]
fn test_complete_workflow_csv() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");

    writeln!(temp_file, "sepal,petal,species").expect("Failed to write");
    writeln!(temp_file, "1.0,0.2,setosa").expect("Failed to write");
    writeln!(temp_file, "1.1,0.3,setosa").expect("Failed to write");
    writeln!(temp_file, "0.9,0.2,setosa").expect("Failed to write");
    writeln!(temp_file, "3.0,1.5,versicolor").expect("Failed to write");
    writeln!(temp_file, "3.2,1.4,versicolor").expect("Failed to write");
    writeln!(temp_file, "2.9,1.6,versicolor").expect("Failed to write");
    writeln!(temp_file, "5.0,2.5,virginica").expect("Failed to write");
    writeln!(temp_file, "5.1,2.4,virginica").expect("Failed to write");
    writeln!(temp_file, "4.9,2.6,virginica").expect("Failed to write");
    temp_file.flush().expect("Failed to flush");

    let model = KNN::new()
        .with_k(3)
        .fit_from_csv(temp_file.path())
        .expect("Fit should succeed");

    let accuracy = model
        .evaluate_from_csv(temp_file.path())
        .expect("Evaluation should succeed");
    assert_eq!(accuracy, 1.0);

    let info = model.info();
    assert_eq!(info.n_instances, 9);
    assert_eq!(info.labels.len(), 3);

    let dataset = CsvDataset::from_file(temp_file.path()).expect("Failed to load dataset");
    let metrics = model.evaluate_detailed(dataset.instances()).unwrap();
    assert_eq!(metrics.macro_f1(), 1.0);

    let quick_accuracy = quick::evaluate_split(temp_file.path(), temp_file.path(), 1).unwrap();
    assert_eq!(quick_accuracy, 1.0);
}

/// Distribution has one entry per label and sums to one for every valid k
#[test]
fn test_distribution_properties() {
    let vectors = lcg_vectors(42, 40, 3);
    let db = Arc::new(labeled_database(&vectors, &["a", "b", "c", "d"]));
    let labels = db.distinct_labels();

    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    classifier.build_classifier(db, &labels).unwrap();

    for k in [1, 2, 5, 10, 40, 100] {
        classifier.set_k(k).unwrap();
        for query in lcg_vectors(k as u64, 5, 3) {
            let dist = classifier.class_distribution(&query).unwrap();
            assert_eq!(dist.len(), 4);
            assert_relative_eq!(dist.total(), 1.0, epsilon = 1e-12);
            assert!(dist.probabilities().iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }
}

/// Example from the classifier documentation: A, A, C among three neighbors
#[test]
fn test_vote_fractions_on_a_line() {
    let mut db = InMemoryDatabase::new();
    db.insert(fv(&[0.1]), "A".into()).unwrap();
    db.insert(fv(&[0.2]), "A".into()).unwrap();
    db.insert(fv(&[0.3]), "C".into()).unwrap();
    db.insert(fv(&[9.0]), "B".into()).unwrap();

    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    classifier
        .set_parameters(&ParameterSet::from_pairs([("k", "3")]))
        .unwrap();
    let labels: Vec<ClassLabel> = vec!["C".into(), "A".into(), "B".into()];
    classifier.build_classifier(Arc::new(db), &labels).unwrap();

    let dist = classifier.class_distribution(&fv(&[0.0])).unwrap();
    assert_relative_eq!(dist.probability(&"A".into()).unwrap(), 2.0 / 3.0);
    assert_eq!(dist.probability(&"B".into()), Some(0.0));
    assert_relative_eq!(dist.probability(&"C".into()).unwrap(), 1.0 / 3.0);
}

/// Fewer stored instances than k still yields a proper distribution
#[test]
fn test_short_store() {
    let vectors = lcg_vectors(7, 3, 2);
    let db = Arc::new(labeled_database(&vectors, &["x", "y"]));

    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    classifier.set_k(10).unwrap();
    classifier
        .build_classifier(db, &["x".into(), "y".into()])
        .unwrap();

    let dist = classifier.class_distribution(&fv(&[0.0, 0.0])).unwrap();
    assert_relative_eq!(dist.probability(&"x".into()).unwrap(), 2.0 / 3.0);
    assert_relative_eq!(dist.probability(&"y".into()).unwrap(), 1.0 / 3.0);
}

#[test]
fn test_empty_store_fails_prediction_but_not_state() {
    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    classifier.set_k(5).unwrap();
    classifier
        .build_classifier(Arc::new(InMemoryDatabase::new()), &["A".into()])
        .unwrap();

    for _ in 0..2 {
        let err = classifier.class_distribution(&fv(&[1.0])).unwrap_err();
        assert!(matches!(err, KnnError::InvalidState { .. }));
        assert!(!err.is_configuration_error());
    }
    assert!(classifier.is_built());
    assert_eq!(classifier.k(), 5);
}

#[test]
fn test_wrong_k_reported_at_configuration() {
    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    let err = classifier
        .set_parameters(&ParameterSet::from_pairs([("k", "-1")]))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("-1"));
    assert!(msg.contains("number of neighbors (>0) to take into account for classification (default=1)"));
}

#[test]
fn test_kernel_metric_properties() {
    let linear = KernelDistance::linear();
    let kernel = PolynomialKernel::linear();
    let euclid = EuclideanDistance;
    let vectors = lcg_vectors(3, 20, 5);

    for a in &vectors {
        assert!(linear.distance(a, a).unwrap().abs() < 1e-6);
        for b in &vectors {
            assert_eq!(
                kernel.similarity(a, b).unwrap(),
                kernel.similarity(b, a).unwrap()
            );
            let d = linear.distance(a, b).unwrap();
            assert!(d >= 0.0);
            assert_relative_eq!(d, euclid.distance(a, b).unwrap(), epsilon = 1e-6, max_relative = 1e-9);
        }
    }

    let err = linear
        .distance(&fv(&[1.0, 2.0, 3.0]), &fv(&[1.0, 2.0, 3.0, 4.0]))
        .unwrap_err();
    assert!(matches!(err, KnnError::DimensionalityMismatch { expected: 3, actual: 4 }));
}

/// Every built-in metric classifies well separated clusters correctly
#[test]
fn test_metrics_agree_on_separated_clusters() {
    let mut instances = Vec::new();
    for i in 0..5 {
        let offset = i as f64 * 0.1;
        instances.push(LabeledInstance::new(fv(&[offset, offset]), "low".into()));
        instances.push(LabeledInstance::new(fv(&[3.0 + offset, 3.0 - offset]), "high".into()));
    }

    for metric in [
        Metric::Linear,
        Metric::Euclidean,
        Metric::Polynomial {
            degree: 2,
            bias: 1.0,
        },
        Metric::Rbf { gamma: 0.5 },
    ] {
        let model = KNN::with_distance(metric)
            .with_k(3)
            .fit(instances.clone())
            .unwrap();
        assert_eq!(
            model.predict(&fv(&[0.2, 0.1])).unwrap(),
            ClassLabel::from("low"),
            "metric {metric}"
        );
        assert_eq!(
            model.predict(&fv(&[3.1, 2.9])).unwrap(),
            ClassLabel::from("high"),
            "metric {metric}"
        );
    }
}

#[test]
fn test_description_and_model() {
    let classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    let description = classifier.description();
    assert_eq!(description.name, "kNN-classifier");
    assert_eq!(
        description.purpose,
        "lazy classifier classifies a given instance to the majority class of the k-nearest neighbors"
    );
    assert_eq!(classifier.model(), "lazy learner - provides no model");
}

/// A built classifier answers queries from several threads at once
#[test]
fn test_concurrent_read_only_classification() {
    let vectors = lcg_vectors(11, 60, 4);
    let db = Arc::new(labeled_database(&vectors, &["p", "q", "r"]));
    let labels = db.distinct_labels();

    let mut classifier: KnnClassifier<InMemoryDatabase> = KnnClassifier::new();
    classifier.set_k(7).unwrap();
    classifier.build_classifier(db, &labels).unwrap();

    let queries = lcg_vectors(99, 32, 4);
    let expected: Vec<_> = queries
        .iter()
        .map(|q| classifier.class_distribution(q).unwrap())
        .collect();

    let shared = &classifier;
    std::thread::scope(|scope| {
        let handles: Vec<_> = queries
            .chunks(8)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|q| shared.class_distribution(q).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("worker panicked"))
            .collect();
        assert_eq!(results.len(), expected.len());
        for (got, want) in results.iter().zip(&expected) {
            assert_eq!(got.probabilities(), want.probabilities());
        }
    });
}
