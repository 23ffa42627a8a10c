use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weft_dom::{h, mount, patch, MemoryHost, TreeNode};

const LIST_SIZES: &[usize] = &[16, 128, 1024];

fn keyed_rows(order: impl Iterator<Item = usize>) -> TreeNode {
    TreeNode::element("ul").children(order.map(|row| {
        let key = format!("row-{row}");
        h("li", key.clone()).key(key)
    }))
}

struct DiffFixture {
    host: MemoryHost,
    current: TreeNode,
}

impl DiffFixture {
    fn new(size: usize) -> Self {
        let mut host = MemoryHost::new();
        let app = host.create_container("app");
        let current = keyed_rows(0..size);
        mount(&mut host, &current, app, None).expect("mount bench list");
        Self { host, current }
    }

    fn patch_to(&mut self, next: TreeNode) {
        patch(&mut self.host, &self.current, &next).expect("patch bench list");
        self.current = next;
    }
}

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_reverse");
    for &size in LIST_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut fixture = DiffFixture::new(size);
            let mut reversed = false;
            b.iter(|| {
                reversed = !reversed;
                let next = if reversed {
                    keyed_rows((0..size).rev())
                } else {
                    keyed_rows(0..size)
                };
                fixture.patch_to(black_box(next));
            });
        });
    }
    group.finish();
}

fn bench_rotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_rotate");
    for &size in LIST_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut fixture = DiffFixture::new(size);
            let mut offset = 0;
            b.iter(|| {
                offset = (offset + 1) % size;
                fixture.patch_to(keyed_rows((0..size).map(|row| (row + offset) % size)));
            });
        });
    }
    group.finish();
}

fn bench_shuffle_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_swap_middle");
    for &size in LIST_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut fixture = DiffFixture::new(size);
            let (left, right) = (size / 3, 2 * size / 3);
            let mut swapped = false;
            b.iter(|| {
                swapped = !swapped;
                let order = (0..size).map(|row| match row {
                    row if swapped && row == left => right,
                    row if swapped && row == right => left,
                    row => row,
                });
                fixture.patch_to(keyed_rows(order));
            });
        });
    }
    group.finish();
}

criterion_group!(keyed_diff, bench_reverse, bench_rotate, bench_shuffle_middle);
criterion_main!(keyed_diff);
