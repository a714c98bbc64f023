use criterion::{black_box, criterion_group, criterion_main, Criterion};
use caption_planner::captions::{CaptionPlanner, Line};

fn create_test_lines() -> Vec<Line> {
    let texts = [
        "你好。再见！",
        "今天天气真好，我们出去玩吧",
        "表面是储蓄，实际是负债，每个月还款的压力越来越大，我们到底该怎么办？",
        "学外语最重要的是坚持，每天背十个单词，一年下来就是三千多个。",
    ];

    (0..64)
        .map(|i| {
            let text = texts[i % texts.len()];
            Line::new(if i % 2 == 0 { "橘猫" } else { "白猫" }, text, 1.5 + i as f64 * 0.1)
        })
        .collect()
}

fn bench_plan_line(c: &mut Criterion) {
    let planner = CaptionPlanner::default();
    let line = Line::new(
        "橘猫",
        "表面是储蓄，实际是负债，每个月还款的压力越来越大，我们到底该怎么办？",
        6.4,
    );

    c.bench_function("plan_line_fine", |b| {
        b.iter(|| planner.plan_line(black_box(&line)))
    });
}

fn bench_plan_episode(c: &mut Criterion) {
    let planner = CaptionPlanner::default();
    let lines = create_test_lines();

    c.bench_function("plan_lines_64", |b| {
        b.iter(|| planner.plan_lines(black_box(&lines)))
    });
}

criterion_group!(benches, bench_plan_line, bench_plan_episode);
criterion_main!(benches);
