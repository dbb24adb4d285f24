pub mod medicos;
pub mod pacientes;
pub mod turnos;
pub mod usuarios;
