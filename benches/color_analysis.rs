use criterion::{black_box, criterion_group, criterion_main, Criterion};
use water_scan::{
    rgb_to_lab, CalibrationModel, LabCoefficients, PhEstimator, QualityInterpreter, QualityMetrics, RgbSample,
};

fn benchmark_color_analysis(c: &mut Criterion) {
    c.bench_function("rgb_to_lab", |b| {
        b.iter(|| rgb_to_lab(black_box(182), black_box(196), black_box(205)))
    });

    let lab = rgb_to_lab(182, 196, 205);
    let fallback = PhEstimator::fallback();
    let calibrated = PhEstimator::new(Some(CalibrationModel::new(4.0, LabCoefficients::new(0.02, -0.05, 0.04))));
    c.bench_function("estimate_ph_fallback", |b| b.iter(|| fallback.estimate_ph(black_box(lab))));
    c.bench_function("estimate_ph_calibrated", |b| b.iter(|| calibrated.estimate_ph(black_box(lab))));

    let interpreter = QualityInterpreter::default();
    let metrics = QualityMetrics::new(75.0, 65.0, 80.0);
    c.bench_function("interpret", |b| {
        b.iter(|| interpreter.interpret(black_box(RgbSample::new(150, 60, 40)), black_box(&metrics)))
    });
}

criterion_group!(benches, benchmark_color_analysis);
criterion_main!(benches);
