// Dense linear algebra for the eigenvector solve
//
// Eigenvalues come from reduction to upper Hessenberg form (Gaussian
// elimination with pivoting) followed by the Francis double-shift QR
// algorithm. The principal eigenvector is then recovered by inverse iteration
// against an LU factorization.
//
// Matrices are small (one row per distinct syscall name) so everything works
// on `Vec<Vec<f64>>`.

/// One eigenvalue `re + im·i`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eigenvalue {
    pub re: f64,
    pub im: f64,
}

impl Eigenvalue {
    pub fn modulus(&self) -> f64 {
        self.re.hypot(self.im)
    }
}

/// `|a|` carrying the sign of `b`
fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

/// All eigenvalues of a square matrix
///
/// Returns `None` if some eigenvalue needs more than `max_sweeps` QR sweeps.
pub fn eigenvalues(matrix: &[Vec<f64>], max_sweeps: usize) -> Option<Vec<Eigenvalue>> {
    let n = matrix.len();
    if n == 0 {
        return Some(Vec::new());
    }

    // 1-based working copy keeps the index arithmetic of the QR sweep readable
    let mut a = vec![vec![0.0; n + 1]; n + 1];
    for (i, row) in matrix.iter().enumerate() {
        a[i + 1][1..=n].copy_from_slice(&row[..n]);
    }

    reduce_to_hessenberg(&mut a, n);
    for i in 3..=n {
        for j in 1..i - 1 {
            a[i][j] = 0.0;
        }
    }

    let (wr, wi) = hessenberg_qr(&mut a, n, max_sweeps)?;
    Some(
        (1..=n)
            .map(|i| Eigenvalue {
                re: wr[i],
                im: wi[i],
            })
            .collect(),
    )
}

/// Largest eigenvalue modulus
pub fn spectral_radius(matrix: &[Vec<f64>], max_sweeps: usize) -> Option<f64> {
    let values = eigenvalues(matrix, max_sweeps)?;
    Some(values.iter().map(Eigenvalue::modulus).fold(0.0, f64::max))
}

fn reduce_to_hessenberg(a: &mut [Vec<f64>], n: usize) {
    for m in 2..n {
        let mut x = 0.0;
        let mut pivot = m;
        for j in m..=n {
            if a[j][m - 1].abs() > f64::abs(x) {
                x = a[j][m - 1];
                pivot = j;
            }
        }

        if pivot != m {
            for j in (m - 1)..=n {
                let tmp = a[pivot][j];
                a[pivot][j] = a[m][j];
                a[m][j] = tmp;
            }
            for row in a.iter_mut().take(n + 1).skip(1) {
                row.swap(pivot, m);
            }
        }

        if x != 0.0 {
            for i in (m + 1)..=n {
                let mut y = a[i][m - 1];
                if y != 0.0 {
                    y /= x;
                    a[i][m - 1] = y;
                    for j in m..=n {
                        let delta = y * a[m][j];
                        a[i][j] -= delta;
                    }
                    for j in 1..=n {
                        let delta = y * a[j][i];
                        a[j][m] += delta;
                    }
                }
            }
        }
    }
}

/// Francis double-shift QR on an upper Hessenberg matrix (1-based)
///
/// Returns (real parts, imaginary parts), both 1-based.
fn hessenberg_qr(
    a: &mut [Vec<f64>],
    n: usize,
    max_sweeps: usize,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let mut wr = vec![0.0; n + 1];
    let mut wi = vec![0.0; n + 1];

    let mut anorm = 0.0;
    for i in 1..=n {
        for j in i.saturating_sub(1).max(1)..=n {
            anorm += a[i][j].abs();
        }
    }

    let mut nn = n;
    let mut t = 0.0;

    while nn >= 1 {
        let mut its = 0;
        loop {
            // Look for a single small subdiagonal element
            let mut l = nn;
            while l >= 2 {
                let mut s = a[l - 1][l - 1].abs() + a[l][l].abs();
                if s == 0.0 {
                    s = anorm;
                }
                if a[l][l - 1].abs() <= f64::EPSILON * s {
                    a[l][l - 1] = 0.0;
                    break;
                }
                l -= 1;
            }

            let mut x = a[nn][nn];
            if l == nn {
                // One root found
                wr[nn] = x + t;
                wi[nn] = 0.0;
                nn -= 1;
            } else {
                let mut y = a[nn - 1][nn - 1];
                let mut w = a[nn][nn - 1] * a[nn - 1][nn];
                if l == nn - 1 {
                    // Two roots found
                    let p = 0.5 * (y - x);
                    let q = p * p + w;
                    let mut z = q.abs().sqrt();
                    x += t;
                    if q >= 0.0 {
                        z = p + sign(z, p);
                        wr[nn - 1] = x + z;
                        wr[nn] = x + z;
                        if z != 0.0 {
                            wr[nn] = x - w / z;
                        }
                        wi[nn - 1] = 0.0;
                        wi[nn] = 0.0;
                    } else {
                        wr[nn - 1] = x + p;
                        wr[nn] = x + p;
                        wi[nn - 1] = -z;
                        wi[nn] = z;
                    }
                    nn -= 2;
                } else {
                    if its >= max_sweeps {
                        return None;
                    }
                    if its > 0 && its % 10 == 0 {
                        // Exceptional shift
                        t += x;
                        for i in 1..=nn {
                            a[i][i] -= x;
                        }
                        let s = a[nn][nn - 1].abs() + a[nn - 1][nn - 2].abs();
                        x = 0.75 * s;
                        y = x;
                        w = -0.4375 * s * s;
                    }
                    its += 1;

                    // Form the shift and look for two consecutive small
                    // subdiagonal elements
                    let mut m = nn - 2;
                    let mut p;
                    let mut q;
                    let mut r;
                    loop {
                        let z = a[m][m];
                        r = x - z;
                        let s = y - z;
                        p = (r * s - w) / a[m + 1][m] + a[m][m + 1];
                        q = a[m + 1][m + 1] - z - r - s;
                        r = a[m + 2][m + 1];
                        let s = p.abs() + q.abs() + r.abs();
                        p /= s;
                        q /= s;
                        r /= s;
                        if m == l {
                            break;
                        }
                        let u = a[m][m - 1].abs() * (q.abs() + r.abs());
                        let v = p.abs()
                            * (a[m - 1][m - 1].abs() + z.abs() + a[m + 1][m + 1].abs());
                        if u <= f64::EPSILON * v {
                            break;
                        }
                        m -= 1;
                    }

                    for i in (m + 2)..=nn {
                        a[i][i - 2] = 0.0;
                        if i != m + 2 {
                            a[i][i - 3] = 0.0;
                        }
                    }

                    // Double QR step on rows l..=nn and columns m..=nn
                    for k in m..nn {
                        if k != m {
                            p = a[k][k - 1];
                            q = a[k + 1][k - 1];
                            r = 0.0;
                            if k != nn - 1 {
                                r = a[k + 2][k - 1];
                            }
                            x = p.abs() + q.abs() + r.abs();
                            if x != 0.0 {
                                p /= x;
                                q /= x;
                                r /= x;
                            }
                        }

                        let s = sign((p * p + q * q + r * r).sqrt(), p);
                        if s == 0.0 {
                            continue;
                        }

                        if k == m {
                            if l != m {
                                a[k][k - 1] = -a[k][k - 1];
                            }
                        } else {
                            a[k][k - 1] = -s * x;
                        }
                        p += s;
                        x = p / s;
                        y = q / s;
                        let z = r / s;
                        q /= p;
                        r /= p;

                        // Row modification
                        for j in k..=nn {
                            let mut pp = a[k][j] + q * a[k + 1][j];
                            if k != nn - 1 {
                                pp += r * a[k + 2][j];
                                a[k + 2][j] -= pp * z;
                            }
                            a[k + 1][j] -= pp * y;
                            a[k][j] -= pp * x;
                        }

                        // Column modification
                        let mmin = if nn < k + 3 { nn } else { k + 3 };
                        for row in a.iter_mut().take(mmin + 1).skip(l) {
                            let mut pp = x * row[k] + y * row[k + 1];
                            if k != nn - 1 {
                                pp += z * row[k + 2];
                                row[k + 2] -= pp * r;
                            }
                            row[k + 1] -= pp * q;
                            row[k] -= pp;
                        }
                    }
                }
            }

            if l + 1 >= nn {
                break;
            }
        }
    }

    Some((wr, wi))
}

/// LU factorization with partial pivoting
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Vec<Vec<f64>>,
    perm: Vec<usize>,
}

impl LuDecomposition {
    /// Factor a square matrix
    ///
    /// Exactly singular pivots are nudged to a tiny value so that the
    /// factorization can drive inverse iteration at a shift sitting on an
    /// eigenvalue.
    pub fn factor(matrix: &[Vec<f64>]) -> Self {
        let n = matrix.len();
        let mut lu = matrix.to_vec();
        let mut perm: Vec<usize> = (0..n).collect();

        let scale = matrix
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
            .max(1.0);
        let tiny = f64::EPSILON * scale;

        for k in 0..n {
            let pivot = (k..n)
                .max_by(|&a, &b| lu[a][k].abs().total_cmp(&lu[b][k].abs()))
                .unwrap_or(k);
            lu.swap(k, pivot);
            perm.swap(k, pivot);

            if lu[k][k].abs() < tiny {
                lu[k][k] = sign(tiny, lu[k][k]);
            }

            for i in (k + 1)..n {
                let factor = lu[i][k] / lu[k][k];
                lu[i][k] = factor;
                for j in (k + 1)..n {
                    let delta = factor * lu[k][j];
                    lu[i][j] -= delta;
                }
            }
        }

        Self { lu, perm }
    }

    /// Solve `A x = b`
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.lu.len();
        let mut x: Vec<f64> = self.perm.iter().map(|&p| b[p]).collect();

        for i in 0..n {
            for j in 0..i {
                x[i] -= self.lu[i][j] * x[j];
            }
        }
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                x[i] -= self.lu[i][j] * x[j];
            }
            x[i] /= self.lu[i][i];
        }

        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_real(values: &[Eigenvalue]) -> Vec<f64> {
        let mut re: Vec<f64> = values.iter().map(|v| v.re).collect();
        re.sort_by(f64::total_cmp);
        re
    }

    #[test]
    fn test_eigenvalues_empty() {
        assert_eq!(eigenvalues(&[], 30), Some(Vec::new()));
    }

    #[test]
    fn test_eigenvalues_single() {
        let values = eigenvalues(&[vec![4.0]], 30).unwrap();
        assert_eq!(values, vec![Eigenvalue { re: 4.0, im: 0.0 }]);
    }

    #[test]
    fn test_eigenvalues_diagonal() {
        let m = vec![vec![2.0, 0.0], vec![0.0, 3.0]];
        let re = sorted_real(&eigenvalues(&m, 30).unwrap());
        assert!((re[0] - 2.0).abs() < 1e-12);
        assert!((re[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_eigenvalues_upper_triangular() {
        let m = vec![
            vec![1.0, 2.0, 3.0],
            vec![0.0, 4.0, 5.0],
            vec![0.0, 0.0, 6.0],
        ];
        let re = sorted_real(&eigenvalues(&m, 30).unwrap());
        assert!((re[0] - 1.0).abs() < 1e-10);
        assert!((re[1] - 4.0).abs() < 1e-10);
        assert!((re[2] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_eigenvalues_symmetric() {
        // Eigenvalues 1 and 3
        let m = vec![vec![2.0, 1.0], vec![1.0, 2.0]];
        let re = sorted_real(&eigenvalues(&m, 30).unwrap());
        assert!((re[0] - 1.0).abs() < 1e-10);
        assert!((re[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_eigenvalues_complex_pair() {
        let m = vec![vec![0.0, -1.0], vec![1.0, 0.0]];
        let values = eigenvalues(&m, 30).unwrap();
        for v in &values {
            assert!(v.re.abs() < 1e-12);
            assert!((v.im.abs() - 1.0).abs() < 1e-12);
            assert!((v.modulus() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spectral_radius_general_matrix() {
        // Characteristic polynomial λ^3 - 6λ^2 + 11λ - 6 → roots 1, 2, 3
        let m = vec![
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![6.0, -11.0, 6.0],
        ];
        let rho = spectral_radius(&m, 30).unwrap();
        assert!((rho - 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_spectral_radius_cycle() {
        // Directed 3-cycle: eigenvalues are the cube roots of unity
        let m = vec![
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
        ];
        let rho = spectral_radius(&m, 30).unwrap();
        assert!((rho - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_spectral_radius_nilpotent() {
        let m = vec![
            vec![0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0],
        ];
        let rho = spectral_radius(&m, 30).unwrap();
        assert!(rho.abs() < 1e-12);
    }

    #[test]
    fn test_lu_solve() {
        let m = vec![
            vec![2.0, 1.0, 1.0],
            vec![4.0, -6.0, 0.0],
            vec![-2.0, 7.0, 2.0],
        ];
        let lu = LuDecomposition::factor(&m);
        let x = lu.solve(&[5.0, -2.0, 9.0]);
        let expected = [1.0, 1.0, 2.0];
        for (got, want) in x.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_lu_needs_pivoting() {
        let m = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let x = LuDecomposition::factor(&m).solve(&[3.0, 7.0]);
        assert!((x[0] - 7.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lu_singular_stays_finite() {
        let m = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let x = LuDecomposition::factor(&m).solve(&[1.0, 1.0]);
        assert!(x.iter().all(|v| v.is_finite()));
    }
}
