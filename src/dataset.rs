//! Named example instances for the CLI, grounded on
//! `examples/original_source/branch-and-price/src/input_data/general_assignment_problem.py`.

use crate::problem::Problem;

/// `M=2, T=7` instance used throughout the test suite and as a quick CLI run.
pub fn small_example() -> Problem {
    Problem::new(
        vec![
            vec![4.0, 1.0, 2.0, 1.0, 4.0, 3.0, 8.0],
            vec![9.0, 9.0, 8.0, 1.0, 3.0, 8.0, 7.0],
        ],
        vec![
            vec![6.0, 9.0, 4.0, 2.0, 10.0, 3.0, 6.0],
            vec![4.0, 8.0, 9.0, 1.0, 7.0, 5.0, 4.0],
        ],
        vec![11.0, 22.0],
    )
    .expect("small_example is a valid instance")
}

/// `M=8, T=24` instance, large enough to exercise the branch-and-bound tree.
pub fn medium_example() -> Problem {
    let weight = vec![
        vec![8.0, 18.0, 22.0, 5.0, 11.0, 11.0, 22.0, 11.0, 17.0, 22.0, 11.0, 20.0, 13.0, 13.0, 7.0, 22.0, 15.0, 22.0, 24.0, 8.0, 8.0, 24.0, 18.0, 8.0],
        vec![24.0, 14.0, 11.0, 15.0, 24.0, 8.0, 10.0, 15.0, 19.0, 25.0, 6.0, 13.0, 10.0, 25.0, 19.0, 24.0, 13.0, 12.0, 5.0, 18.0, 10.0, 24.0, 8.0, 5.0],
        vec![22.0, 22.0, 21.0, 22.0, 13.0, 16.0, 21.0, 5.0, 25.0, 13.0, 12.0, 9.0, 24.0, 6.0, 22.0, 24.0, 11.0, 21.0, 11.0, 14.0, 12.0, 10.0, 20.0, 6.0],
        vec![13.0, 8.0, 19.0, 12.0, 19.0, 18.0, 10.0, 21.0, 5.0, 9.0, 11.0, 9.0, 22.0, 8.0, 12.0, 13.0, 9.0, 25.0, 19.0, 24.0, 22.0, 6.0, 19.0, 14.0],
        vec![25.0, 16.0, 13.0, 5.0, 11.0, 8.0, 7.0, 8.0, 25.0, 20.0, 24.0, 20.0, 11.0, 6.0, 10.0, 10.0, 6.0, 22.0, 10.0, 10.0, 13.0, 21.0, 5.0, 19.0],
        vec![19.0, 19.0, 5.0, 11.0, 22.0, 24.0, 18.0, 11.0, 6.0, 13.0, 24.0, 24.0, 22.0, 6.0, 22.0, 5.0, 14.0, 6.0, 16.0, 11.0, 6.0, 8.0, 18.0, 10.0],
        vec![24.0, 10.0, 9.0, 10.0, 6.0, 15.0, 7.0, 13.0, 20.0, 8.0, 7.0, 9.0, 24.0, 9.0, 21.0, 9.0, 11.0, 19.0, 10.0, 5.0, 23.0, 20.0, 5.0, 21.0],
        vec![6.0, 9.0, 9.0, 5.0, 12.0, 10.0, 16.0, 15.0, 19.0, 18.0, 20.0, 18.0, 16.0, 21.0, 11.0, 12.0, 22.0, 16.0, 21.0, 25.0, 7.0, 14.0, 16.0, 10.0],
    ];
    let profit = vec![
        vec![25.0, 23.0, 20.0, 16.0, 19.0, 22.0, 20.0, 16.0, 15.0, 22.0, 15.0, 21.0, 20.0, 23.0, 20.0, 22.0, 19.0, 25.0, 25.0, 24.0, 21.0, 17.0, 23.0, 17.0],
        vec![16.0, 19.0, 22.0, 22.0, 19.0, 23.0, 17.0, 24.0, 15.0, 24.0, 18.0, 19.0, 20.0, 24.0, 25.0, 25.0, 19.0, 24.0, 18.0, 21.0, 16.0, 25.0, 15.0, 20.0],
        vec![20.0, 18.0, 23.0, 23.0, 23.0, 17.0, 19.0, 16.0, 24.0, 24.0, 17.0, 23.0, 19.0, 22.0, 23.0, 25.0, 23.0, 18.0, 19.0, 24.0, 20.0, 17.0, 23.0, 23.0],
        vec![16.0, 16.0, 15.0, 23.0, 15.0, 15.0, 25.0, 22.0, 17.0, 20.0, 19.0, 16.0, 17.0, 17.0, 20.0, 17.0, 17.0, 18.0, 16.0, 18.0, 15.0, 25.0, 22.0, 17.0],
        vec![17.0, 23.0, 21.0, 20.0, 24.0, 22.0, 25.0, 17.0, 22.0, 20.0, 16.0, 22.0, 21.0, 23.0, 24.0, 15.0, 22.0, 25.0, 18.0, 19.0, 19.0, 17.0, 22.0, 23.0],
        vec![24.0, 21.0, 23.0, 17.0, 21.0, 19.0, 19.0, 17.0, 18.0, 24.0, 15.0, 15.0, 17.0, 18.0, 15.0, 24.0, 19.0, 21.0, 23.0, 24.0, 17.0, 20.0, 16.0, 21.0],
        vec![18.0, 21.0, 22.0, 23.0, 22.0, 15.0, 18.0, 15.0, 21.0, 22.0, 15.0, 23.0, 21.0, 25.0, 25.0, 23.0, 20.0, 16.0, 25.0, 17.0, 15.0, 15.0, 18.0, 16.0],
        vec![19.0, 24.0, 18.0, 17.0, 21.0, 18.0, 24.0, 25.0, 18.0, 23.0, 21.0, 15.0, 24.0, 23.0, 18.0, 18.0, 23.0, 23.0, 16.0, 20.0, 20.0, 19.0, 25.0, 21.0],
    ];
    let capacity = vec![36.0, 35.0, 38.0, 34.0, 32.0, 34.0, 31.0, 34.0];
    Problem::new(weight, profit, capacity).expect("medium_example is a valid instance")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_example_has_expected_dimensions() {
        let p = small_example();
        assert_eq!(p.num_machines(), 2);
        assert_eq!(p.num_tasks(), 7);
    }

    #[test]
    fn medium_example_has_expected_dimensions() {
        let p = medium_example();
        assert_eq!(p.num_machines(), 8);
        assert_eq!(p.num_tasks(), 24);
    }
}
