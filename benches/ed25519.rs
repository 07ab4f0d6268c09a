use curve25519::ed25519::{PrivateKey, sign, verify, verify_single};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_keypair(c: &mut Criterion) {
    let seed = [7u8; 32];

    c.bench_function("ed25519 keypair", |b| {
        b.iter(|| PrivateKey::from_seed(black_box(&seed)).public_key())
    });
}

pub fn bench_sign(c: &mut Criterion) {
    let private = PrivateKey::from_seed(&[7u8; 32]);
    let message = [0u8; 64];

    c.bench_function("ed25519 sign 64 bytes", |b| {
        b.iter(|| sign(black_box(&message), &private, None, &[]))
    });
}

pub fn bench_verify(c: &mut Criterion) {
    let private = PrivateKey::from_seed(&[7u8; 32]);
    let public = private.public_key();
    let message = [0u8; 64];
    let signature = sign(&message, &private, None, &[]);

    c.bench_function("ed25519 verify 64 bytes", |b| {
        b.iter(|| verify(black_box(&signature), &message, &public, None, &[]))
    });
}

pub fn bench_verify_single(c: &mut Criterion) {
    let private = PrivateKey::from_seed(&[7u8; 32]);
    let public = private.public_key();
    let message = [0u8; 64];
    let signature = sign(&message, &private, None, &[]);

    c.bench_function("ed25519 verify_single 64 bytes", |b| {
        b.iter(|| verify_single(black_box(&signature), &message, &public, None, &[]))
    });
}

criterion_group!(benches, bench_keypair, bench_sign, bench_verify, bench_verify_single);
criterion_main!(benches);
