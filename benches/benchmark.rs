use criterion::{
    criterion_group,
    criterion_main,
    BenchmarkGroup,
    Criterion,
    SamplingMode
};
use criterion::measurement::WallTime;

use block_sudoku::SudokuGrid;
use block_sudoku::generator::{Generator, Reducer, ReducerConfig};
use block_sudoku::solver::{
    BacktrackingSolver,
    Solution,
    SolutionLimit,
    Solver
};

use std::time::Duration;

// Explanation of benchmark classes:
//
// solve: Classifying puzzles of known solution with a seeded
//        BacktrackingSolver.
// enumerate: Finding all solutions of an ambiguous 16x16 grid.
// generate: Generating full grids of different block sizes.
// reduce: Reducing full 9x9 grids to half of their clues.

const MEASUREMENT_TIME_SECS: u64 = 30;
const DEFAULT_SAMPLE_SIZE: usize = 100;
const SLOW_SAMPLE_SIZE: usize = 20;

struct Task {
    puzzle: SudokuGrid,
    solution: SudokuGrid
}

fn task(puzzle: &str, solution: &str) -> Task {
    Task {
        puzzle: SudokuGrid::parse(puzzle).unwrap(),
        solution: SudokuGrid::parse(solution).unwrap()
    }
}

fn tasks() -> Vec<Task> {
    vec![
        task("2; , , ,4, ,4,3, , ,3, , , , ,1, ",
            "2;3,1,2,4,2,4,3,1,1,3,4,2,4,2,1,3"),
        task("3;\
             , , , ,8,1, , , ,\
             , ,2, , ,7,8, , ,\
             ,5,3, , , ,1,7, ,\
            3,7, , , , , , , ,\
            6, , , , , , , ,3,\
             , , , , , , ,2,4,\
             ,6,9, , , ,2,3, ,\
             , ,5,9, , ,4, , ,\
             , , ,6,5, , , , ",
            "3;\
            7,4,6,2,8,1,3,5,9,\
            9,1,2,5,3,7,8,4,6,\
            8,5,3,4,9,6,1,7,2,\
            3,7,4,1,2,5,6,9,8,\
            6,2,8,7,4,9,5,1,3,\
            5,9,1,3,6,8,7,2,4,\
            1,6,9,8,7,4,2,3,5,\
            2,8,5,9,1,3,4,6,7,\
            4,3,7,6,5,2,9,8,1")
    ]
}

fn configure(group: &mut BenchmarkGroup<WallTime>, sample_size: usize) {
    group.measurement_time(Duration::from_secs(MEASUREMENT_TIME_SECS));
    group.sample_size(sample_size);
    group.sampling_mode(SamplingMode::Flat);
}

fn benchmark_solve(c: &mut Criterion) {
    let tasks = tasks();
    let mut solver = BacktrackingSolver::seeded(0);
    let mut group = c.benchmark_group("solve");
    configure(&mut group, DEFAULT_SAMPLE_SIZE);
    group.bench_function("unique", |b| b.iter(|| {
        for task in &tasks {
            let computed_solution = solver.solve(&task.puzzle);
            assert_eq!(Solution::Unique(task.solution.clone()),
                computed_solution);
        }
    }));
}

fn benchmark_enumerate(c: &mut Criterion) {
    let grid = SudokuGrid::parse("4;\
         1, 0, 0, 0, 0, 0, 0, 8, 9, 0,11, 0, 0, 0, 0,16,\
         5, 0, 0, 8, 9, 0,11, 0, 0,14,15,16, 0, 0, 3, 0,\
         9, 0,11, 0,13,14,15, 0, 0, 2, 0, 0, 5, 6, 7, 8,\
         0, 0, 0, 0, 0, 2, 0, 4, 0, 0, 7, 8, 9,10,11,12,\
         2, 0, 4, 5, 6, 0, 8, 9, 0, 0, 0, 0, 0,15,16, 0,\
         6, 7, 8, 0, 0, 0,12, 0, 0, 0,16, 1, 0, 3, 0, 0,\
        10,11, 0, 0,14,15,16, 1, 2, 3, 4, 5, 6, 0, 8, 9,\
        14,15, 0, 0, 2, 3, 0, 0, 6, 7, 0, 9, 0,11, 0, 0,\
         3, 0, 5, 6, 0, 0, 0,10, 0,12,13,14, 0, 0, 1, 0,\
         7, 8, 0,10,11,12, 0,14,15,16, 1, 2, 3, 0, 5, 6,\
        11,12,13, 0,15, 0, 1, 0, 3, 4, 5, 6, 7, 8, 0, 0,\
        15,16, 1, 2, 0, 4, 5, 6, 0, 0, 9, 0, 0,12, 0,14,\
         4, 5, 6, 7, 8, 9, 0, 0,12,13,14,15,16, 0, 0, 3,\
         0, 9, 0, 0,12, 0,14,15, 0, 1, 2, 0, 0, 5, 6, 7,\
        12, 0,14,15, 0, 0, 2, 0, 4, 0, 0, 0, 8, 9, 0, 0,\
        16, 0, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0,12, 0, 0,15").unwrap();
    let mut solver = BacktrackingSolver::seeded(0);
    let mut group = c.benchmark_group("enumerate");
    configure(&mut group, DEFAULT_SAMPLE_SIZE);
    group.bench_function("16x16", |b| b.iter(|| {
        assert_eq!(4, solver.solutions(&grid, SolutionLimit::All).len());
    }));
}

fn benchmark_generate(c: &mut Criterion) {
    let mut generator = Generator::seeded(0);
    let mut group = c.benchmark_group("generate");
    configure(&mut group, DEFAULT_SAMPLE_SIZE);

    for block_size in 2..=4 {
        let id = format!("block size {}", block_size);
        group.bench_function(&id, |b| b.iter(||
            generator.generate_solved(block_size).unwrap()));
    }
}

fn benchmark_reduce(c: &mut Criterion) {
    let full = Generator::seeded(0).generate_solved(3).unwrap();
    let config = ReducerConfig {
        time_budget: Duration::from_secs(MEASUREMENT_TIME_SECS),
        ..ReducerConfig::default()
    };
    let mut reducer = Reducer::seeded(0);
    let mut group = c.benchmark_group("reduce");
    configure(&mut group, SLOW_SAMPLE_SIZE);
    group.bench_function("9x9 half", |b| b.iter(||
        assert!(reducer.reduce(&full, &config).unwrap().success)));
}

criterion_group!(all,
    benchmark_solve,
    benchmark_enumerate,
    benchmark_generate,
    benchmark_reduce
);
criterion_main!(all);
