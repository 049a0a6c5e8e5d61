//! Benchmarks for Stratum protocol operations

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use stratum_core::{AuthenticationMode, BlockMode};
use stratum_test::{
    authenticated_encryption, digital_envelope, key_exchange, layered_encryption,
    multiple_encryption,
};

fn bench_authenticated_modes(c: &mut Criterion) {
    let payload = vec![0x42u8; 1024];
    let mut group = c.benchmark_group("authenticated_roundtrip");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for mode in [
        AuthenticationMode::EncryptAndMac,
        AuthenticationMode::MacThenEncrypt,
        AuthenticationMode::EncryptThenMac,
    ] {
        let mut protocol = authenticated_encryption(mode);
        group.bench_function(format!("{:?}", mode), |b| {
            b.iter(|| {
                let sealed = protocol.authenticated_encrypt_data(black_box(&payload)).unwrap();
                protocol.authenticated_decrypt_data(sealed).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let payload = vec![0u8; 4096];
    let mut protocol = digital_envelope(true);

    c.bench_function("envelope_seal_4096", |b| {
        b.iter(|| protocol.seal_envelope(black_box(&payload)).unwrap())
    });

    let sealed = protocol.seal_envelope(&payload).unwrap();
    c.bench_function("envelope_open_4096", |b| {
        b.iter(|| protocol.open_envelope(black_box(&sealed)).unwrap())
    });
}

fn bench_key_exchange(c: &mut Criterion) {
    let kx = key_exchange();
    let request = kx.generate_exchange_request_information().unwrap();
    let response = kx
        .generate_exchange_response_information(&request.prime, &request.generator)
        .unwrap();

    c.bench_function("key_exchange_request_2048", |b| {
        b.iter(|| kx.generate_exchange_request_information().unwrap())
    });

    c.bench_function("shared_secret_2048", |b| {
        b.iter(|| {
            kx.compute_shared_secret(black_box(&response.public_key), &request.private_key)
                .unwrap()
        })
    });
}

fn bench_multiple_by_iterations(c: &mut Criterion) {
    let payload = vec![0u8; 1024];
    let mut group = c.benchmark_group("multiple_encrypt_by_iterations");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for iterations in [2, 4, 8] {
        let mut protocol = multiple_encryption(BlockMode::Cbc);
        group.bench_function(format!("{}_passes", iterations), |b| {
            b.iter(|| {
                protocol
                    .multiple_encrypt_data(black_box(&payload), iterations)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_layered(c: &mut Criterion) {
    let payload = vec![0u8; 1024];
    let cascade = layered_encryption();

    let mut group = c.benchmark_group("layered_encrypt");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("three_layers", |b| {
        b.iter(|| cascade.layered_encrypt_data(black_box(&payload), b"").unwrap())
    });
    group.bench_function("three_layers_with_pad", |b| {
        b.iter(|| cascade.layered_encrypt_data(black_box(&payload), b"one time pad").unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_authenticated_modes,
    bench_envelope,
    bench_key_exchange,
    bench_multiple_by_iterations,
    bench_layered,
);
criterion_main!(benches);
