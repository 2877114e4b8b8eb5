// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use praxis::model::{derive_view_id, OpenRequest, TabSession, ViewKind};
use praxis::ops::{apply_tab_op, TabOp};

mod profiler;

// Benchmark identity (keep stable):
// - Group name in this file: `ops.apply`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `open_dedup_50`, `churn_200`).
fn checksum_session(session: &TabSession) -> u64 {
    let mut acc = session.open_views().len() as u64;
    for view in session.open_views() {
        for byte in view.id().as_str().bytes() {
            acc = acc.wrapping_mul(131).wrapping_add(u64::from(byte));
        }
    }
    for byte in session.focused_id().as_str().bytes() {
        acc = acc.wrapping_mul(131).wrapping_add(u64::from(byte));
    }
    acc
}

fn apply_all(session: &TabSession, ops: &[TabOp]) -> TabSession {
    ops.iter().fold(session.clone(), |session, op| apply_tab_op(&session, op))
}

/// `count` open ops cycling over `unique` distinct detail ids, so later opens
/// hit the dedup-and-focus path.
fn open_ops(count: usize, unique: u64) -> Vec<TabOp> {
    (0..count)
        .map(|idx| {
            let entity_id = (idx as u64) % unique;
            TabOp::Open(OpenRequest::detail(
                ViewKind::PatientDetail,
                format!("Patient #{entity_id}"),
                entity_id,
                None,
            ))
        })
        .collect()
}

/// A deterministic open/focus/close interleaving over a small id set.
fn churn_ops(count: usize) -> Vec<TabOp> {
    (0..count)
        .map(|idx| {
            let entity_id = (idx as u64).wrapping_mul(7) % 16;
            match idx % 3 {
                0 => TabOp::Open(OpenRequest::detail(
                    ViewKind::PatientDetail,
                    format!("Patient #{entity_id}"),
                    entity_id,
                    None,
                )),
                1 => TabOp::Focus {
                    view_id: derive_view_id(ViewKind::PatientDetail, Some(entity_id)),
                },
                _ => TabOp::Close {
                    view_id: derive_view_id(ViewKind::PatientDetail, Some(entity_id)),
                },
            }
        })
        .collect()
}

fn hydrate_op(views: u64) -> TabOp {
    let open_views = (0..views)
        .map(|entity_id| {
            OpenRequest::detail(
                ViewKind::InvoiceDetail,
                format!("Invoice #{entity_id}"),
                entity_id,
                None,
            )
            .into_view()
        })
        .collect::<Vec<_>>();
    let focused_id = Some(derive_view_id(ViewKind::InvoiceDetail, Some(views / 2)));
    TabOp::Hydrate {
        open_views,
        focused_id,
    }
}

fn benches_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.apply");
    let template = TabSession::default();

    let single = open_ops(1, 1);
    group.throughput(Throughput::Elements(single.len() as u64));
    group.bench_function("open_single", {
        let template = template.clone();
        move |b| {
            b.iter_batched(
                || template.clone(),
                |session| black_box(checksum_session(&apply_all(&session, &single))),
                BatchSize::SmallInput,
            )
        }
    });

    let dedup_50 = open_ops(50, 10);
    group.throughput(Throughput::Elements(dedup_50.len() as u64));
    group.bench_function("open_dedup_50", {
        let template = template.clone();
        move |b| {
            b.iter_batched(
                || template.clone(),
                |session| black_box(checksum_session(&apply_all(&session, &dedup_50))),
                BatchSize::SmallInput,
            )
        }
    });

    let churn_200 = churn_ops(200);
    group.throughput(Throughput::Elements(churn_200.len() as u64));
    group.bench_function("churn_200", {
        let template = template.clone();
        move |b| {
            b.iter_batched(
                || template.clone(),
                |session| black_box(checksum_session(&apply_all(&session, &churn_200))),
                BatchSize::SmallInput,
            )
        }
    });

    let hydrate_50 = vec![hydrate_op(50)];
    group.throughput(Throughput::Elements(hydrate_50.len() as u64));
    group.bench_function("hydrate_50", {
        let template = template.clone();
        move |b| {
            b.iter_batched(
                || template.clone(),
                |session| black_box(checksum_session(&apply_all(&session, &hydrate_50))),
                BatchSize::SmallInput,
            )
        }
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_ops
}
criterion_main!(benches);
