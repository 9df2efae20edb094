use codspeed_criterion_compat::{
    BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};
use logview::{WindowController, group_lines};

// Mix of structured entries, stack traces and bracketed generic lines
fn generate_log(num_entries: usize) -> String {
    let mut text = String::with_capacity(num_entries * 96);

    for i in 0..num_entries {
        let level = match i % 10 {
            0 => "ERROR",
            1 | 2 => "WARN",
            3 => "DEBUG",
            _ => "INFO",
        };
        if i % 7 == 0 {
            text.push_str(&format!(
                "[2023-10-27 10:{:02}:{:02}] worker {i} restarted\n",
                i / 60 % 60,
                i % 60
            ));
        } else {
            text.push_str(&format!(
                "2024-01-01 10:{:02}:{:02}.{:03} [pool-{}] {level} app.Service - request {i} done\n",
                i / 60 % 60,
                i % 60,
                i % 1000,
                i % 8
            ));
        }
        if level == "ERROR" {
            text.push_str("java.lang.IllegalStateException: boom\n");
            text.push_str("  at app.Service.handle(Service.java:120)\n");
            text.push_str("  at app.Server.run(Server.java:42)\n");
        }
    }

    text
}

fn benchmark_group_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_lines");

    for num_entries in [1_000, 10_000, 100_000].iter() {
        let text = generate_log(*num_entries);
        let lines: Vec<&str> = text.lines().collect();

        group.bench_with_input(
            BenchmarkId::new("group", num_entries),
            &lines,
            |b, lines| b.iter(|| group_lines(black_box(lines))),
        );
    }

    group.finish();
}

fn benchmark_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let text = generate_log(50_000);

    group.bench_function("load_initial", |b| {
        b.iter(|| {
            let mut controller = WindowController::new(500);
            controller.load_initial(black_box(&text));
            controller
        })
    });

    group.bench_function("load_older_to_start", |b| {
        b.iter(|| {
            let mut controller = WindowController::new(500);
            controller.load_initial(&text);
            while controller.can_load_older() {
                controller.load_older();
            }
            controller.window().len()
        })
    });

    let tail: Vec<String> = generate_log(100).lines().map(str::to_string).collect();
    group.bench_function("append_tail", |b| {
        b.iter(|| {
            let mut controller = WindowController::new(500);
            controller.load_initial(&text);
            controller.append_tail(black_box(&tail))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_group_lines, benchmark_window);
criterion_main!(benches);
