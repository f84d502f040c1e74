/// Point pairs `[ax, ay, bx, by]` compared by each descriptor bit, in bit
/// order. Offsets are normal with sigma = 31/5, rounded and clamped to the
/// 27x27 window; no pair compares a pixel with itself. The table is fixed so
/// descriptors stay comparable across builds and machines.
#[rustfmt::skip]
pub const BIT_PATTERN: [[i32; 4]; 256] = [
    [3, 1, -1, -5], [10, 7, 10, -4], [-3, -12, -13, 1], [-3, 7, -1, -2],
    [9, 1, 11, 0], [5, -13, -8, -4], [-7, 3, 4, -8], [3, -4, 0, 3],
    [6, -3, 3, 0], [-6, -7, 6, -13], [-1, -13, 5, 7], [-8, -13, -3, -10],
    [-11, 7, 4, 8], [4, -1, -13, 1], [-5, -2, 5, -12], [1, -2, 4, 3],
    [8, -3, 2, -1], [0, -2, -10, -4], [2, 1, -3, -8], [0, 13, -5, 13],
    [7, -1, 6, -8], [0, -4, -11, 11], [-2, -1, -4, -3], [8, 0, 1, -7],
    [-9, 8, -8, 7], [-4, -3, 0, 0], [7, 2, -3, -8], [13, 4, 0, 7],
    [-2, -9, 2, 1], [-7, 4, 3, -2], [-5, -3, -2, -2], [0, 3, -6, 7],
    [12, 7, 1, 6], [3, -8, -10, -1], [-2, 1, -11, -4], [3, -4, 4, -5],
    [1, -1, -13, 0], [-1, -5, -10, 6], [4, -6, 0, 2], [-6, 1, 7, 4],
    [-8, -12, -1, -12], [0, 2, 0, 12], [7, -9, 0, 9], [-7, 2, 7, 1],
    [1, -1, -7, -2], [-4, -3, 4, -12], [-5, 0, 5, -5], [-7, 9, 5, 1],
    [6, 13, 0, 0], [0, 3, 4, 10], [9, 2, -2, -8], [-1, 2, 1, -8],
    [2, -7, 6, 2], [-13, 2, 2, 1], [-3, 5, -6, -1], [10, -3, 5, 1],
    [7, 2, 7, 1], [0, -7, 7, 12], [12, 5, -1, -1], [-7, 5, 4, 4],
    [4, -1, -1, -8], [12, 9, -4, 3], [-7, 3, 13, 3], [-4, -4, -6, -2],
    [12, -9, 0, 3], [0, -1, 4, -7], [-5, 4, -10, -1], [-8, -9, 0, -7],
    [-8, 4, -2, 10], [0, 4, 4, -2], [0, -12, 2, -2], [-5, 2, 3, -2],
    [-5, 3, -5, 0], [5, -6, -6, -8], [-6, 4, -8, -11], [4, -5, -1, -2],
    [-7, 7, 6, 3], [2, -4, 0, 4], [-2, 13, 6, 0], [-7, -11, 3, 0],
    [-13, -1, 5, 5], [-5, 2, -1, 1], [13, 3, -8, 3], [-13, -3, 0, 0],
    [5, 8, -7, -10], [-13, -4, -2, -4], [9, -1, 3, 1], [5, 1, 11, -7],
    [3, -4, 5, 13], [8, 1, -13, 9], [-13, 2, -3, 2], [3, 0, -9, 5],
    [2, -13, -10, 0], [-13, 1, 6, 3], [10, 3, 8, -12], [6, -12, -5, 5],
    [13, -5, -4, -10], [12, 4, 0, -6], [-3, 5, 6, -4], [-2, -11, 10, 0],
    [-9, -13, 0, 5], [-1, -13, 8, -4], [3, 0, -5, 3], [6, -1, 0, -2],
    [-9, 13, 6, 6], [13, 4, 0, -7], [5, -4, 3, 1], [3, -11, -4, 4],
    [-4, 1, -1, 1], [11, -4, 4, 1], [1, -1, -5, 0], [8, 8, -2, 6],
    [-8, 4, -3, -5], [-13, -6, -10, 1], [-2, -7, 3, -3], [-4, -3, 4, 1],
    [-5, 7, 3, 1], [-1, -3, -1, -1], [7, -4, -9, 9], [-6, -6, -1, 1],
    [2, -2, 5, 7], [-2, 10, 4, -4], [-8, -6, -3, 0], [-11, -9, -1, 4],
    [12, 6, 7, 7], [6, -3, -12, -1], [-2, -4, -2, -3], [-2, -4, 2, 7],
    [5, -4, 5, -11], [7, 0, 5, -4], [3, -4, -9, -2], [3, -12, 8, 4],
    [5, -3, -5, -2], [0, 3, 1, 2], [1, -3, -13, -3], [1, 4, -5, 1],
    [0, -1, 4, 2], [-1, -1, 7, -7], [-10, -7, -5, 1], [4, 10, 0, 6],
    [4, 4, 9, 2], [5, 8, 7, -2], [3, -1, 5, -1], [-2, -4, 9, -9],
    [4, -5, 3, -13], [-4, -3, 5, 6], [11, 4, -4, 3], [8, -4, 13, 9],
    [-2, 6, 9, -6], [-4, -8, -3, 2], [3, -3, 6, 5], [-11, 2, 0, 2],
    [-2, 3, -13, -5], [-2, -10, -1, 5], [-13, -3, -4, 5], [-2, -6, 2, 10],
    [4, 11, -1, 2], [5, -1, 8, -1], [2, 0, 1, -6], [13, -1, 2, -7],
    [2, -2, 10, -7], [0, 2, 1, 0], [0, 6, -2, 5], [-1, 2, -9, -2],
    [11, 2, 5, -1], [1, -6, 0, 3], [1, -1, 10, 10], [-12, 2, 0, 3],
    [3, -1, 7, 4], [7, -1, 5, 4], [4, 5, 7, -1], [-10, -2, -3, 8],
    [-7, -11, -3, -4], [-12, -4, 0, -3], [6, 13, 7, 3], [-6, 5, -4, 1],
    [7, -6, -7, 0], [-4, 9, -3, 4], [-10, -3, 4, -3], [-1, -3, 2, -3],
    [8, 8, -12, -4], [-2, 0, 8, -4], [7, 2, 10, 1], [-4, 9, 1, -10],
    [-7, -1, 0, 4], [6, 7, 2, -2], [-5, -6, -2, 2], [-3, -2, 7, 4],
    [1, 3, -5, 2], [8, -9, 0, 3], [5, -5, -2, -6], [-8, -2, -4, -12],
    [-1, 2, -8, -2], [5, 7, 2, 13], [1, 10, 2, 0], [7, 9, 1, 13],
    [0, 4, 2, -2], [-2, 5, -13, -11], [3, -3, 1, 0], [2, 7, -2, 4],
    [6, -3, 2, -7], [1, -11, 5, -5], [1, 4, -12, 8], [0, 4, -5, 0],
    [-6, 1, 1, 2], [-3, 6, -3, -2], [2, -2, 2, 4], [7, 1, -2, -5],
    [-7, -13, -3, -4], [-2, 1, 3, -4], [0, 1, 3, -5], [1, -4, -3, 1],
    [-5, 0, 1, 3], [-3, 2, 4, 13], [2, 1, -7, 3], [3, 1, 1, 6],
    [1, 2, 2, 5], [7, 1, -6, -4], [-3, 4, 0, 0], [-3, -2, -1, 2],
    [1, 0, -7, 3], [13, -7, -1, 4], [2, 11, -10, 6], [2, 2, 8, 2],
    [9, 2, 1, 0], [7, -1, -12, 7], [0, 0, 7, -2], [4, 3, -1, -9],
    [7, -13, -2, 1], [4, -3, -3, 4], [1, 7, 4, -6], [6, 2, -13, -5],
    [0, 7, 5, 1], [-3, 6, 2, -5], [1, 1, 7, -3], [9, 4, -1, -12],
    [-1, 12, -5, 2], [-7, 11, 1, -2], [2, -6, 1, -6], [3, 1, -4, 0],
    [0, -6, 8, -3], [-2, 1, 7, -2], [-12, -3, 1, 4], [-4, -8, -2, -7],
    [-2, 1, 11, 5], [-4, 8, 1, 0], [-4, -2, -9, -6], [4, -9, -1, -2],
    [-3, 8, 2, -1], [0, -9, 8, 1], [-4, 0, 3, 1], [-9, 6, -3, 1],
    [9, 3, -8, -6], [-8, 2, -9, -7], [-2, -1, -6, 2], [9, 8, -8, 11],
];
