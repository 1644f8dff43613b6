use crate::session::{new_rng, Snapshot};
use crate::{Config, DarbouxError, Function, Session, SumDetails};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

fn value_error(e: DarbouxError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

#[pyclass(name = "Darboux")]
pub struct DarbouxWrapper {
    pub session: Session,
}

#[pymethods]
impl DarbouxWrapper {
    #[new]
    fn new(
        a: f64,
        b: f64,
        max_points: usize,
        function: &str,
        mode: &str,
        seed: Option<u64>,
    ) -> PyResult<DarbouxWrapper> {
        let config = Config {
            a,
            b,
            max_points,
            function: function.parse().map_err(value_error)?,
            mode: mode.parse().map_err(value_error)?,
        };

        Ok(DarbouxWrapper {
            session: Session::new(config, seed).map_err(value_error)?,
        })
    }

    #[staticmethod]
    fn load_config(filename: &str, seed: Option<u64>) -> PyResult<Self> {
        let reader = std::fs::OpenOptions::new().read(true).open(filename)?;
        let config: Config = serde_yaml::from_reader(&reader)
            .map_err(|e| pyo3::exceptions::PyIOError::new_err(e.to_string()))?;

        Ok(DarbouxWrapper {
            session: Session::new(config, seed).map_err(value_error)?,
        })
    }

    fn save_config(&self, filename: &str) -> PyResult<()> {
        let writer = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(filename)?;

        serde_yaml::to_writer(writer, self.session.config())
            .map_err(|e| pyo3::exceptions::PyIOError::new_err(e.to_string()))
    }

    /// Serialize the points and sums so that the run can be resumed with `from_bytes`.
    fn to_bytes<'py>(&self, py: Python<'py>) -> PyResult<&'py PyBytes> {
        let data = bincode::serialize(&self.session.snapshot())
            .map_err(|e| pyo3::exceptions::PyIOError::new_err(e.to_string()))?;
        Ok(PyBytes::new(py, &data))
    }

    #[staticmethod]
    fn from_bytes(data: &PyBytes, seed: Option<u64>) -> PyResult<Self> {
        let snapshot: Snapshot = bincode::deserialize(data.as_bytes())
            .map_err(|e| pyo3::exceptions::PyIOError::new_err(e.to_string()))?;

        Ok(DarbouxWrapper {
            session: Session::from_snapshot(snapshot, seed).map_err(value_error)?,
        })
    }

    fn step(&mut self) -> PyResult<bool> {
        self.session.step().map_err(value_error)
    }

    fn run(&mut self) -> PyResult<usize> {
        self.session.run().map_err(value_error)
    }

    fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    fn points(&self) -> Vec<f64> {
        self.session.points().to_vec()
    }

    /// Get the lower sum, the upper sum and the index of the widest subinterval.
    fn sums(&self) -> (f64, f64, usize) {
        let d = self.session.details();
        (d.lower_sum, d.upper_sum, d.max_subinterval_index)
    }

    fn report(&self) -> String {
        self.session.report().to_string()
    }
}

#[pyfunction]
fn function_names() -> Vec<&'static str> {
    Function::ALL.iter().map(|f| f.key()).collect()
}

#[pyfunction]
fn compute_sums(points: Vec<f64>, function: &str) -> PyResult<(Vec<f64>, f64, f64, usize)> {
    let f: Function = function.parse().map_err(value_error)?;
    let (points, d) = crate::compute_sums(points, &f);
    Ok((points, d.lower_sum, d.upper_sum, d.max_subinterval_index))
}

#[pyfunction]
fn insert_point(
    points: Vec<f64>,
    function: &str,
    lower_sum: f64,
    upper_sum: f64,
    max_subinterval_index: usize,
    seed: Option<u64>,
) -> PyResult<(Vec<f64>, f64, f64, usize)> {
    let f: Function = function.parse().map_err(value_error)?;
    let details = SumDetails {
        lower_sum,
        upper_sum,
        max_subinterval_index,
    };

    let (points, d) =
        crate::insert_point(points, &f, &details, &mut new_rng(seed)).map_err(value_error)?;
    Ok((points, d.lower_sum, d.upper_sum, d.max_subinterval_index))
}

#[pyfunction]
fn refine_equidistant(points: Vec<f64>) -> Vec<f64> {
    crate::refine_equidistant(&points)
}

#[pymodule]
fn darboux(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<DarbouxWrapper>()?;
    m.add_function(wrap_pyfunction!(function_names, m)?)?;
    m.add_function(wrap_pyfunction!(compute_sums, m)?)?;
    m.add_function(wrap_pyfunction!(insert_point, m)?)?;
    m.add_function(wrap_pyfunction!(refine_equidistant, m)?)?;

    // the mode names accepted by the constructor
    m.add("MODES", vec!["random", "equidistant"])?;

    Ok(())
}
