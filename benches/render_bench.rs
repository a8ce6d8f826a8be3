use criterion::{black_box, criterion_group, criterion_main, Criterion};

use routinegrid::rendering::layout::{plan, LayoutOptions};
use routinegrid::rendering::render;
use routinegrid::{CourseEntry, GridBuilder, ScheduleSource, ThemeConfig};

fn sources(people: usize) -> Vec<ScheduleSource> {
    (0..people)
        .map(|i| ScheduleSource {
            display_name: format!("Person{}", i),
            entries: vec![
                CourseEntry {
                    course_code: "CSE110".to_string(),
                    section_label: format!("{:02}", i + 1),
                    instructor: "TBA".to_string(),
                    class_sessions: vec![
                        "SUN (9:30 AM-10:50 AM-7A)".to_string(),
                        "TUE (9:30 AM-10:50 AM-7A)".to_string(),
                    ],
                    lab_sessions: vec!["THU (8:00 AM-10:50 AM-LAB3)".to_string()],
                    lab_course_code: Some("CSE110L".to_string()),
                },
                CourseEntry {
                    course_code: "MAT120".to_string(),
                    section_label: "04".to_string(),
                    instructor: "XYZ".to_string(),
                    class_sessions: vec!["MON (2:00 PM-3:20 PM-9C)".to_string()],
                    ..Default::default()
                },
            ],
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let theme = ThemeConfig::default();
    let input = sources(8);
    c.bench_function("build_grid_8_people", |b| {
        b.iter(|| GridBuilder::new(&theme).build_sources(black_box(&input)))
    });
}

fn bench_render(c: &mut Criterion) {
    let theme = ThemeConfig::default();
    let grid = GridBuilder::new(&theme).build_sources(&sources(8)).grid;
    let options = LayoutOptions::default();
    c.bench_function("plan_and_render_8_people", |b| {
        b.iter(|| {
            let p = plan(black_box(&grid), &theme, options);
            render(&grid, &p, &theme).unwrap()
        })
    });
}

criterion_group!(benches, bench_build, bench_render);
criterion_main!(benches);
