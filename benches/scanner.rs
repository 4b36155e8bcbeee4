use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use tsuji::{Engine, Limits, Method, RequestState, Route};

fn engine() -> Engine {
    let mut engine = Engine::with_limits(Limits {
        query_limit: 4096,
        ..Limits::default()
    });
    engine.register_routes(&[
        Route::new(Method::GET, "", 0),
        Route::new(Method::GET, "users/:id", 1),
        Route::new(Method::GET, "users/:id/posts", 2),
        Route::new(Method::GET, "search", 3),
        Route::new(Method::GET, "assets/*", 4),
        Route::new(Method::POST, "api/v1/items", 5),
    ]);
    engine
}

fn request_with_headers(count: usize) -> Vec<u8> {
    let mut raw = String::from("GET /search HTTP/1.1\r\nHost: example.com\r\n");
    for i in 0..count {
        use std::fmt::Write;
        let _ = write!(raw, "X-Custom-Header-{i}: value-{i}\r\n");
    }
    raw.push_str("\r\n");
    raw.into_bytes()
}

fn bench_request_line(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("request_line");

    let requests: Vec<(&str, &[u8])> = vec![
        ("minimal", b"GET /search HTTP/1.1\r\n\r\n"),
        ("param", b"GET /users/42/posts HTTP/1.1\r\n\r\n"),
        (
            "query",
            b"GET /search?q=rust+parser&page=1&limit=20 HTTP/1.1\r\n\r\n",
        ),
        ("wildcard", b"GET /assets/js/app.min.js HTTP/1.1\r\n\r\n"),
    ];

    for (name, raw) in &requests {
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("scan", name), raw, |b, raw| {
            b.iter(|| {
                let mut state = RequestState::new();
                engine.scan_request_line(raw, &mut state)
            });
        });
    }

    group.finish();
}

fn bench_headers(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("headers");

    let known: &[u8] = b"GET /search HTTP/1.1\r\n\
        Host: api.example.com\r\n\
        User-Agent: bench/1.0\r\n\
        Accept: application/json\r\n\
        Accept-Encoding: gzip, br\r\n\
        Authorization: Bearer abcdef0123456789\r\n\
        Content-Length: 128\r\n\
        \r\n";
    group.throughput(Throughput::Bytes(known.len() as u64));
    group.bench_function("known_names", |b| {
        b.iter(|| {
            let mut state = RequestState::new();
            engine.scan_request_line(known, &mut state)
        });
    });

    for count in [10usize, 30, 50] {
        let raw = request_with_headers(count);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("arbitrary_names", count),
            &raw,
            |b, raw| {
                b.iter(|| {
                    let mut state = RequestState::new();
                    engine.scan_request_line(raw, &mut state)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_request_line, bench_headers);
criterion_main!(benches);
