table! {
    medico (id) {
        id -> Integer,
        nombre -> Varchar,
        apellido -> Varchar,
        especialidad -> Varchar,
        matricula_profesional -> Varchar,
    }
}

table! {
    paciente (id) {
        id -> Integer,
        nombre -> Varchar,
        apellido -> Varchar,
        dni -> Varchar,
        fecha_nacimiento -> Date,
        obra_social -> Nullable<Varchar>,
    }
}

table! {
    turno (id) {
        id -> Integer,
        paciente_id -> Integer,
        medico_id -> Integer,
        fecha -> Date,
        hora -> Time,
        estado -> Varchar,
        observaciones -> Nullable<Text>,
    }
}

table! {
    usuario (id) {
        id -> Integer,
        nombre -> Varchar,
        email -> Varchar,
        contrasena -> Varchar,
    }
}

joinable!(turno -> medico (medico_id));
joinable!(turno -> paciente (paciente_id));

allow_tables_to_appear_in_same_query!(medico, paciente, turno, usuario,);
